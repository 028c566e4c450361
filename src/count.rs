use std::collections::BTreeMap;
use std::f64::consts::LN_2;

use log::trace;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use parking_lot::{RwLock, RwLockReadGuard, RwLockUpgradableReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::sfa::Dfa;

/// Number of accepted strings per state and length, grown on demand.
///
/// Readers share the table; a reader that needs a longer table than the one
/// present takes the upgradable lock and extends it, and anyone racing with
/// it finds the work already done.
pub struct CountTable {
    // per state: (target, number of symbols leading there)
    edges: Vec<Vec<(usize, u64)>>,
    accepting: Vec<bool>,
    start: usize,
    limit: usize,
    table: RwLock<Table>,
}

pub struct Table {
    // counts[k][q]: accepted strings of length k starting in q
    counts: Vec<Vec<BigUint>>,
    // amounts[k]: accepted strings shorter than k
    amounts: Vec<BigUint>,
}

impl Table {
    /// Lengths 0..len() are available.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, length: usize, state: usize) -> &BigUint {
        &self.counts[length][state]
    }

    /// Available for lengths 0..=len().
    pub fn amount(&self, length: usize) -> &BigUint {
        &self.amounts[length]
    }
}

impl CountTable {
    pub fn new(dfa: &Dfa, limit: usize) -> Self {
        let edges = (0..dfa.size())
            .map(|state| {
                let mut targets: BTreeMap<usize, u64> = BTreeMap::new();
                for class in 0..dfa.classes().len() {
                    if let Some(next) = dfa.next(state, class) {
                        *targets.entry(next).or_insert(0) += dfa.weight(class);
                    }
                }
                targets.into_iter().collect()
            })
            .collect();

        CountTable {
            edges,
            accepting: dfa.accepting(),
            start: dfa.start(),
            limit,
            table: RwLock::new(Table {
                counts: vec![],
                amounts: vec![BigUint::zero()],
            }),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// A view holding every length up to and including `length`.
    pub fn table(&self, length: usize) -> Result<RwLockReadGuard<'_, Table>> {
        if length > self.limit {
            return Err(Error::LengthOutOfRange {
                length,
                limit: self.limit,
            });
        }

        let table = self.table.read();
        if table.len() > length {
            return Ok(table);
        }
        drop(table);

        let table = self.table.upgradable_read();
        if table.len() > length {
            return Ok(RwLockUpgradableReadGuard::downgrade(table));
        }
        let mut table = RwLockUpgradableReadGuard::upgrade(table);
        let from = table.len();
        while table.len() <= length {
            self.extend(&mut table);
        }
        trace!("count table extended from {} to {} lengths", from, table.len());
        Ok(RwLockWriteGuard::downgrade(table))
    }

    fn extend(&self, table: &mut Table) {
        let row: Vec<BigUint> = match table.counts.last() {
            None => self
                .accepting
                .iter()
                .map(|accepting| BigUint::from(*accepting as u32))
                .collect(),
            Some(previous) => self
                .edges
                .iter()
                .map(|edges| {
                    edges
                        .iter()
                        .filter(|(next, _)| !previous[*next].is_zero())
                        .map(|(next, weight)| &previous[*next] * *weight)
                        .sum()
                })
                .collect(),
        };

        let amount = table.amounts[table.counts.len()].clone() + &row[self.start];
        table.amounts.push(amount);
        table.counts.push(row);
    }

    /// Accepted strings of exactly `length` symbols.
    pub fn count(&self, length: usize) -> Result<BigUint> {
        Ok(self.table(length)?.count(length, self.start).clone())
    }

    /// Accepted strings shorter than `length`.
    pub fn amount(&self, length: usize) -> Result<BigUint> {
        Ok(self.table(length.saturating_sub(1))?.amount(length).clone())
    }

    /// Length of the string ranked `value`: the smallest k with
    /// amount(k + 1) > value.
    pub fn length_of(&self, value: &BigUint) -> Result<usize> {
        let mut checked = 0;
        let mut length = 0;
        loop {
            let table = self.table(length).map_err(|_| Error::ValueOutOfRange)?;
            if let Some(k) = (checked..=length).find(|k| table.amount(k + 1) > value) {
                return Ok(k);
            }
            if length == self.limit {
                return Err(Error::ValueOutOfRange);
            }
            checked = length + 1;
            length = (length * 2 + 1).min(self.limit);
        }
    }
}

/// Natural logarithm of a big integer; negative infinity for zero.
pub fn ln(value: &BigUint) -> f64 {
    let bits = value.bits();
    if bits <= 1000 {
        return value.to_f64().map_or(f64::INFINITY, f64::ln);
    }
    let shift = bits - 64;
    let head = (value >> shift).to_f64().unwrap_or(f64::INFINITY);
    head.ln() + shift as f64 * LN_2
}
