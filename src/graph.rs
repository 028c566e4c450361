// Spectral view of an automaton: the transition count matrix, its strongly
// connected components and the dominant eigenvalue governing growth.

mod matrix;
mod scc;
mod spectrum;

pub use matrix::Matrix;
pub use scc::Scc;
pub use spectrum::Spectrum;
