use crate::encoding::Symbol;

#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub kind: AstKind,
    pub children: Vec<Ast>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstKind {
    Group,                     // ( child )
    Concat,                    // child child ...
    Alternate,                 // child | child ...
    Repeat(u32, RepeatKind),   // child{min,max}
    Literal(SymbolSet),        // a, [a-z], ., \d
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RepeatKind {
    Num(u32),
    Infinity,
}

pub const MAX_SYMBOL: Symbol = 0x10FFFF;

/// A set of code points kept as sorted, disjoint, non-adjacent inclusive
/// ranges over U+0000..=U+10FFFF. Narrowing to an encoding's alphabet happens
/// when the NFA is built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SymbolSet {
    ranges: Vec<(Symbol, Symbol)>,
}

impl SymbolSet {
    pub fn new() -> Self {
        SymbolSet::default()
    }

    pub fn single(c: char) -> Self {
        SymbolSet {
            ranges: vec![(c as Symbol, c as Symbol)],
        }
    }

    pub fn range(a: Symbol, b: Symbol) -> Self {
        SymbolSet {
            ranges: vec![(a, b)],
        }
    }

    pub fn any() -> Self {
        SymbolSet::range(0, MAX_SYMBOL)
    }

    pub fn ranges(&self) -> &[(Symbol, Symbol)] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, s: Symbol) -> bool {
        let i = self.ranges.partition_point(|(_, hi)| *hi < s);
        i < self.ranges.len() && self.ranges[i].0 <= s
    }

    pub fn insert_range(&mut self, a: Symbol, b: Symbol) {
        self.ranges.push((a, b));
        self.normalize();
    }

    pub fn union(&mut self, other: &SymbolSet) {
        self.ranges.extend_from_slice(&other.ranges);
        self.normalize();
    }

    pub fn negate(&self) -> SymbolSet {
        let mut ranges = vec![];
        let mut next = 0;
        for (lo, hi) in self.ranges.iter() {
            if *lo > next {
                ranges.push((next, lo - 1));
            }
            next = hi + 1;
        }
        if next <= MAX_SYMBOL {
            ranges.push((next, MAX_SYMBOL));
        }
        SymbolSet { ranges }
    }

    /// Adds the simple (one-to-one) upper and lower case mappings of every
    /// member.
    pub fn fold_case(&mut self) {
        let mut extra = vec![];
        for (lo, hi) in self.ranges.iter() {
            for c in (*lo..=*hi).filter_map(char::from_u32) {
                let mut lower = c.to_lowercase();
                if let (Some(l), None) = (lower.next(), lower.next()) {
                    if l != c {
                        extra.push(l as Symbol);
                    }
                }
                let mut upper = c.to_uppercase();
                if let (Some(u), None) = (upper.next(), upper.next()) {
                    if u != c {
                        extra.push(u as Symbol);
                    }
                }
            }
        }
        self.ranges.extend(extra.into_iter().map(|s| (s, s)));
        self.normalize();
    }

    fn normalize(&mut self) {
        self.ranges.sort_unstable();
        let mut merged: Vec<(Symbol, Symbol)> = Vec::with_capacity(self.ranges.len());
        for (lo, hi) in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(last) if lo <= last.1.saturating_add(1) => {
                    last.1 = last.1.max(hi);
                }
                _ => merged.push((lo, hi)),
            }
        }
        self.ranges = merged;
    }
}
