use num_bigint::BigUint;
use num_traits::Zero;

use crate::sfa::Dfa;

const POWER_ITERATION_LIMIT: usize = 100_000;
const TOLERANCE: f64 = 1e-12;

/// Dense square matrix of transition counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    size: usize,
    data: Vec<u64>,
}

impl Matrix {
    pub fn new(size: usize) -> Self {
        Matrix {
            size,
            data: vec![0; size * size],
        }
    }

    /// Entry (i, j) is the number of symbols leading from state i to state j.
    pub fn adjacency(dfa: &Dfa) -> Self {
        let mut matrix = Matrix::new(dfa.size());
        matrix.add_transitions(dfa);
        matrix
    }

    /// The adjacency matrix plus an absorbing acceptance state `size()-1`:
    /// every accepting state has one edge into it and it loops onto itself,
    /// so walks of length n from the start into it count the accepted strings
    /// shorter than n.
    pub fn extended(dfa: &Dfa) -> Self {
        let accept = dfa.size();
        let mut matrix = Matrix::new(dfa.size() + 1);
        matrix.add_transitions(dfa);
        for state in (0..dfa.size()).filter(|s| dfa.is_accepting(*s)) {
            matrix.add(state, accept, 1);
        }
        matrix.add(accept, accept, 1);
        matrix
    }

    fn add_transitions(&mut self, dfa: &Dfa) {
        for state in 0..dfa.size() {
            for class in 0..dfa.classes().len() {
                if let Some(next) = dfa.next(state, class) {
                    self.add(state, next, dfa.weight(class));
                }
            }
        }
    }

    fn add(&mut self, i: usize, j: usize, weight: u64) {
        self.data[i * self.size + j] += weight;
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.data[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[u64] {
        &self.data[i * self.size..(i + 1) * self.size]
    }

    /// Non-zero entries of row `i` as (column, weight).
    pub fn successors(&self, i: usize) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.row(i)
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > 0)
            .map(|(j, w)| (j, *w))
    }

    /// Restriction to the given rows and columns, in the given order.
    pub fn submatrix(&self, indices: &[usize]) -> Matrix {
        let mut sub = Matrix::new(indices.len());
        for (a, i) in indices.iter().enumerate() {
            for (b, j) in indices.iter().enumerate() {
                sub.data[a * sub.size + b] = self.get(*i, *j);
            }
        }
        sub
    }

    /// Weighted number of walks with exactly `length` edges from `from` to `to`.
    pub fn walks(&self, from: usize, to: usize, length: usize) -> BigUint {
        let mut current = vec![BigUint::zero(); self.size];
        current[from] = BigUint::from(1u32);
        for _ in 0..length {
            let mut next = vec![BigUint::zero(); self.size];
            for (i, value) in current.iter().enumerate().filter(|(_, v)| !v.is_zero()) {
                for (j, w) in self.successors(i) {
                    next[j] += value * BigUint::from(w);
                }
            }
            current = next;
        }
        current.swap_remove(to)
    }

    pub(crate) fn multiply(&self, x: &[f64]) -> Vec<f64> {
        (0..self.size)
            .map(|i| {
                self.row(i)
                    .iter()
                    .zip(x)
                    .map(|(a, b)| *a as f64 * b)
                    .sum()
            })
            .collect()
    }

    /// Dominant eigenvalue by plain power iteration over the whole matrix.
    ///
    /// No restriction to the growth component is made, so it is meant as a
    /// cross-check of the reduced computation. A nilpotent matrix yields 0.
    pub fn frobenius_root(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }

        let mut x = vec![1.0 / self.size as f64; self.size];
        let mut estimate = 0.0;
        for _ in 0..POWER_ITERATION_LIMIT {
            let y = self.multiply(&x);
            let norm: f64 = y.iter().sum();
            if norm == 0.0 {
                return 0.0;
            }
            // x is kept at 1-norm 1
            let previous = estimate;
            estimate = norm;
            x = y.into_iter().map(|v| v / norm).collect();
            if (estimate - previous).abs() <= TOLERANCE * estimate {
                return estimate;
            }
        }

        log::warn!(
            "power iteration did not converge after {} steps",
            POWER_ITERATION_LIMIT
        );
        estimate
    }
}
