mod codec;
mod count;
mod encoding;
mod error;
mod graph;
mod numeral;
pub mod parser;
mod rans;
mod sfa;

pub use encoding::{Encoding, Symbol};
pub use error::{Error, Result};
pub use graph::{Matrix, Scc, Spectrum};
pub use rans::{Options, Rans};
pub use sfa::{Dfa, Nfa};

/// Ranks, counts and amounts are arbitrary precision.
pub type Value = num_bigint::BigUint;
