use std::collections::BTreeSet;

use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use once_cell::sync::OnceCell;

use crate::codec;
use crate::count::{self, CountTable};
use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::graph::{Matrix, Scc, Spectrum};
use crate::numeral;
use crate::sfa::{Dfa, Nfa};


/// Construction flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub encoding: Encoding,
    /// Number the factorial closure (every factor of an accepted string).
    pub factorial: bool,
    pub case_insensitive: bool,
    pub minimize: bool,
    /// Longest string length the count table may grow to.
    pub max_length: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            encoding: Encoding::Ascii,
            factorial: false,
            case_insensitive: false,
            minimize: true,
            max_length: 65_536,
        }
    }
}

/// A regular language used as a numeral system.
///
/// Every accepted string has a unique rank in shortlex order, which makes the
/// language usable for counting, compression and conversion between two
/// languages. The automaton never changes after construction; the derived
/// views are computed on first use and shared by all callers.
pub struct Rans {
    dfa: Dfa,
    options: Options,
    counts: CountTable,
    matrix: OnceCell<Matrix>,
    extended: OnceCell<Matrix>,
    scc: OnceCell<Scc>,
    spectrum: OnceCell<Result<Spectrum>>,
}

impl Rans {
    pub fn new(pattern: &str) -> Result<Rans> {
        Rans::with_options(pattern, &Options::default())
    }

    pub fn with_options(pattern: &str, options: &Options) -> Result<Rans> {
        let nfa = Nfa::new(pattern, options.encoding, options.case_insensitive)?;
        let mut dfa = Dfa::compile(&nfa, options.minimize);
        if options.factorial {
            dfa = dfa.factorial(options.minimize);
            debug!("factorial closure: {} states", dfa.size());
        }

        let counts = CountTable::new(&dfa, options.max_length);
        Ok(Rans {
            dfa,
            options: options.clone(),
            counts,
            matrix: OnceCell::new(),
            extended: OnceCell::new(),
            scc: OnceCell::new(),
            spectrum: OnceCell::new(),
        })
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn encoding(&self) -> Encoding {
        self.options.encoding
    }

    /// Number of automaton states.
    pub fn size(&self) -> usize {
        self.dfa.size()
    }

    pub fn adjacency_matrix(&self) -> &Matrix {
        self.matrix.get_or_init(|| Matrix::adjacency(&self.dfa))
    }

    pub fn extended_adjacency_matrix(&self) -> &Matrix {
        self.extended.get_or_init(|| Matrix::extended(&self.dfa))
    }

    /// Strongly connected components in reverse topological order.
    pub fn scc(&self) -> &[BTreeSet<usize>] {
        self.components().components()
    }

    fn components(&self) -> &Scc {
        self.scc.get_or_init(|| Scc::new(self.adjacency_matrix()))
    }

    /// Growth rate of the language from its dominant component.
    pub fn frobenius_root(&self) -> Result<f64> {
        self.spectrum
            .get_or_init(|| {
                Spectrum::new(
                    self.adjacency_matrix(),
                    self.components(),
                    self.dfa.start(),
                    &self.dfa.accepting(),
                )
            })
            .as_ref()
            .map(Spectrum::root)
            .map_err(Clone::clone)
    }

    /// Growth rate by power iteration over the whole matrix.
    pub fn frobenius_root2(&self) -> Result<f64> {
        if self.finite() {
            return Err(Error::DegenerateLanguage);
        }
        Ok(self.adjacency_matrix().frobenius_root())
    }

    pub fn finite(&self) -> bool {
        self.components()
            .growth_components(self.dfa.start(), &self.dfa.accepting())
            .is_empty()
    }

    pub fn accept(&self, text: &[u8]) -> bool {
        self.encoding()
            .decode(text)
            .map_or(false, |symbols| self.dfa.accept(&symbols))
    }

    /// Accepted strings of exactly `length` symbols.
    pub fn count(&self, length: usize) -> Result<BigUint> {
        self.counts.count(length)
    }

    /// Accepted strings shorter than `bound`, or the size of the whole
    /// language without a bound.
    pub fn amount(&self, bound: Option<usize>) -> Result<BigUint> {
        match bound {
            Some(bound) => self.counts.amount(bound),
            None if self.finite() => self.counts.amount(self.finite_bound()),
            None => Err(Error::InfiniteLanguage),
        }
    }

    // an accepted string of a finite language never repeats a state
    fn finite_bound(&self) -> usize {
        self.dfa.size()
    }

    /// Size of this language relative to a reference, in percent.
    ///
    /// Without `other` the reference is every string over the alphabet,
    /// otherwise it is `other`. Finite languages have no growth rate; their
    /// strings up to `count_bound` are used to estimate one.
    pub fn compression_ratio(&self, count_bound: Option<usize>, other: Option<&Rans>) -> Result<f64> {
        let growth = self.growth(count_bound)?;
        let reference = match other {
            Some(other) => other.growth(count_bound)?,
            None => (self.encoding().alphabet_size() as f64).ln(),
        };
        if reference <= 0.0 {
            return Err(Error::DegenerateLanguage);
        }
        Ok(100.0 * (1.0 - growth / reference))
    }

    /// Natural log of the growth rate per symbol.
    fn growth(&self, count_bound: Option<usize>) -> Result<f64> {
        if !self.finite() {
            return Ok(self.frobenius_root()?.ln());
        }

        let bound = count_bound.unwrap_or_else(|| self.finite_bound());
        let amount = self.amount(Some(bound))?;
        let mut longest = 0;
        for length in (1..bound).rev() {
            if !self.count(length)?.is_zero() {
                longest = length;
                break;
            }
        }

        match longest {
            0 => Ok(0.0),
            _ => Ok(count::ln(&amount) / longest as f64),
        }
    }

    pub fn rank(&self, text: &[u8]) -> Result<BigUint> {
        let symbols = self.encoding().decode(text).ok_or(Error::NotAccepted)?;
        numeral::rank(&self.dfa, &self.counts, &symbols)
    }

    pub fn unrank(&self, value: &BigUint) -> Result<Vec<u8>> {
        if self.finite() && *value >= self.amount(None)? {
            return Err(Error::ValueOutOfRange);
        }
        let symbols = numeral::unrank(&self.dfa, &self.counts, value)?;
        Ok(self.encoding().encode(&symbols))
    }

    /// Re-expresses `text` as the string of `into` holding the same rank.
    pub fn convert(&self, text: &[u8], into: &Rans) -> Result<Vec<u8>> {
        let value = self.rank(text)?;
        into.unrank(&value).map_err(|e| match e {
            Error::ValueOutOfRange => Error::IncompatibleConversion,
            e => e,
        })
    }

    pub fn compress(&self, text: &[u8]) -> Result<Vec<u8>> {
        let symbols = self.encoding().decode(text).ok_or(Error::NotAccepted)?;
        let value = numeral::rank(&self.dfa, &self.counts, &symbols)?;
        Ok(codec::serialize(symbols.len(), &value))
    }

    pub fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let (length, value) = codec::deserialize(bytes)?;

        // the table grows as far as the rank needs, never to the header length
        let corrupt = || {
            Error::CorruptInput(format!(
                "rank does not belong to a string of length {}",
                length
            ))
        };
        if self.finite() && value >= self.amount(None)? {
            return Err(corrupt());
        }
        let implied = self.counts.length_of(&value).map_err(|_| corrupt())?;
        if implied != length {
            return Err(corrupt());
        }

        let symbols = numeral::unrank(&self.dfa, &self.counts, &value)?;
        Ok(self.encoding().encode(&symbols))
    }
}
