use self::{builder::Builder, matcher::Matcher};
use crate::encoding::{Encoding, Symbol};
use crate::error::Result;
use crate::parser::{Ast, Parser};

mod builder;
mod matcher;


/// Node 0 is the start node, node 1 the single accepting node.
pub struct Nfa {
    pub(crate) nodes: Vec<Node>,
    pub(crate) encoding: Encoding,
}

impl Nfa {
    pub fn new(pattern: &str, encoding: Encoding, case_insensitive: bool) -> Result<Nfa> {
        let syntax = Parser::parse(pattern, case_insensitive)?;
        Ok(Nfa::build(&syntax, encoding))
    }

    pub fn build(ast: &Ast, encoding: Encoding) -> Nfa {
        let nodes = Builder::build(ast, encoding);
        Nfa { nodes, encoding }
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Whole-input membership by simulating the state set.
    pub fn accept(&self, symbols: &[Symbol]) -> bool {
        Matcher::new(&self.nodes, SUBMIT_ID).execute(symbols)
    }
}

pub(crate) const ROOT_ID: usize = 0;
pub(crate) const SUBMIT_ID: usize = 1;

pub(crate) struct Node {
    pub nexts: Vec<Edge>,
}

pub(crate) struct Edge {
    pub action: EdgeAction,
    pub next_id: usize,
}

pub(crate) enum EdgeAction {
    Asap,
    // sorted, disjoint inclusive ranges inside the alphabet
    Match(Vec<(Symbol, Symbol)>),
}
