pub mod dfa;
pub mod nfa;

pub use dfa::Dfa;
pub use nfa::Nfa;
