use log::{trace, warn};

use super::{Matrix, Scc};
use crate::error::{Error, Result};

const ITERATION_LIMIT: usize = 100_000;
const TOLERANCE: f64 = 1e-12;

/// Dominant eigenvalue of the growth part of a transition graph.
///
/// Only components that are reachable from the start, co-reachable to an
/// accepting state and cyclic contribute to the growth of the language; the
/// root of the whole matrix is the largest root among them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spectrum {
    root: f64,
    component: usize,
}

impl Spectrum {
    pub fn new(matrix: &Matrix, scc: &Scc, start: usize, accepting: &[bool]) -> Result<Spectrum> {
        let mut best: Option<Spectrum> = None;
        for component in scc.growth_components(start, accepting) {
            let states: Vec<usize> = scc.components()[component].iter().copied().collect();
            let root = irreducible_root(&matrix.submatrix(&states));
            trace!("component {} ({} states): root {}", component, states.len(), root);

            if best.map_or(true, |b| root > b.root) {
                best = Some(Spectrum { root, component });
            }
        }
        best.ok_or(Error::DegenerateLanguage)
    }

    pub fn root(&self) -> f64 {
        self.root
    }

    /// Index of the dominant component in the SCC partition.
    pub fn component(&self) -> usize {
        self.component
    }
}

/// Perron root of an irreducible non-negative matrix.
fn irreducible_root(m: &Matrix) -> f64 {
    match m.size() {
        0 => 0.0,
        1 => m.get(0, 0) as f64,
        2 => {
            let (a, b) = (m.get(0, 0) as f64, m.get(0, 1) as f64);
            let (c, d) = (m.get(1, 0) as f64, m.get(1, 1) as f64);
            (a + d) / 2.0 + (((a - d) / 2.0).powi(2) + b * c).sqrt()
        }
        _ => collatz_wielandt(m),
    }
}

/// Brackets the root of A + I between the minimum and maximum of
/// (Bx)_i / x_i while iterating x <- Bx. A + I is primitive when A is
/// irreducible, so both bounds converge; the shift is removed at the end.
fn collatz_wielandt(m: &Matrix) -> f64 {
    let size = m.size();
    let mut x = vec![1.0; size];
    let (mut lower, mut upper) = (0.0, f64::MAX);

    for _ in 0..ITERATION_LIMIT {
        let y: Vec<f64> = m
            .multiply(&x)
            .into_iter()
            .zip(&x)
            .map(|(ax, x)| ax + x)
            .collect();

        let ratios = y.iter().zip(&x).map(|(y, x)| y / x);
        lower = ratios.clone().fold(f64::MAX, f64::min);
        upper = ratios.fold(0.0, f64::max);
        if upper - lower <= TOLERANCE * upper {
            return (lower + upper) / 2.0 - 1.0;
        }

        let norm = y.iter().cloned().fold(0.0, f64::max);
        x = y.into_iter().map(|v| v / norm).collect();
    }

    warn!(
        "root bracketing did not converge after {} steps: [{}, {}]",
        ITERATION_LIMIT, lower, upper
    );
    (lower + upper) / 2.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use crate::sfa::{Dfa, Nfa};

    fn root(pattern: &str) -> (Result<f64>, f64) {
        let dfa = Dfa::compile(&Nfa::new(pattern, Encoding::Ascii, false).unwrap(), true);
        let matrix = Matrix::adjacency(&dfa);
        let scc = Scc::new(&matrix);
        let reduced = Spectrum::new(&matrix, &scc, dfa.start(), &dfa.accepting());
        (reduced.map(|s| s.root()), matrix.frobenius_root())
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn self_loop() {
        let (reduced, direct) = root("[0-9]+");
        assert_close(reduced.unwrap(), 10.0);
        assert_close(direct, 10.0);

        let (reduced, _) = root("x[a-e]*y");
        assert_close(reduced.unwrap(), 5.0);
    }

    #[test]
    fn largest_component_wins() {
        let (reduced, direct) = root("[ab]*c[a-d]*");
        assert_close(reduced.unwrap(), 4.0);
        assert_close(direct, 4.0);
    }

    #[test]
    fn two_state_closed_form() {
        let golden = (1.0 + 5f64.sqrt()) / 2.0;
        let (reduced, direct) = root("(ab|c)*");
        assert_close(reduced.unwrap(), golden);
        assert_close(direct, golden);
    }

    #[test]
    fn bracketing() {
        // x^3 = x^2 + 1
        let (reduced, direct) = root("(abc|d)*");
        assert_close(reduced.unwrap(), 1.465_571_231_876_768);
        assert_close(direct, 1.465_571_231_876_768);

        let (reduced, direct) = root("(a[xy]b|[cd])*e?");
        assert_close(reduced.unwrap(), direct);
    }

    #[test]
    fn cycle_without_growth() {
        let (reduced, _) = root("(ab)*");
        assert_close(reduced.unwrap(), 1.0);
    }

    #[test]
    fn finite_language_is_degenerate() {
        let (reduced, direct) = root("abc|de");
        assert_eq!(reduced, Err(Error::DegenerateLanguage));
        assert_eq!(direct, 0.0);
    }
}
