use std::collections::VecDeque;

use self::builder::Builder;
use crate::encoding::{Encoding, Symbol};
use crate::sfa::nfa::{self, Nfa};

mod builder;
mod minimize;


/// Deterministic automaton over symbol classes.
///
/// State 0 is the start state. Every transition missing from `trans` goes to
/// an implicit reject state, which keeps the function total without storing
/// the sink. Classes are disjoint symbol intervals in ascending order, and
/// their order is the symbol order used for numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) classes: Vec<(Symbol, Symbol)>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) encoding: Encoding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub trans: Vec<Option<usize>>,
    pub is_match: bool,
}

impl Dfa {
    pub fn compile(nfa: &Nfa, minimize: bool) -> Dfa {
        let dfa = Builder::build(nfa);
        log::debug!(
            "subset construction: {} nfa nodes -> {} dfa states, {} classes",
            nfa.size(),
            dfa.size(),
            dfa.classes.len()
        );
        if !minimize {
            return dfa;
        }

        let minimized = dfa.minimize();
        log::debug!(
            "minimization: {} -> {} states, {} classes",
            dfa.size(),
            minimized.size(),
            minimized.classes.len()
        );
        minimized
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn start(&self) -> usize {
        0
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn classes(&self) -> &[(Symbol, Symbol)] {
        &self.classes
    }

    /// Number of concrete symbols in a class.
    pub fn weight(&self, class: usize) -> u64 {
        let (lo, hi) = self.classes[class];
        (hi - lo) as u64 + 1
    }

    pub fn class_of(&self, symbol: Symbol) -> Option<usize> {
        let i = self.classes.partition_point(|(_, hi)| *hi < symbol);
        match self.classes.get(i) {
            Some((lo, _)) if *lo <= symbol => Some(i),
            _ => None,
        }
    }

    pub fn next(&self, state: usize, class: usize) -> Option<usize> {
        self.nodes[state].trans[class]
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.nodes[state].is_match
    }

    pub fn accepting(&self) -> Vec<bool> {
        self.nodes.iter().map(|node| node.is_match).collect()
    }

    /// Follows `symbols` from the start state; `None` once it falls into the
    /// reject state.
    pub fn walk(&self, symbols: &[Symbol]) -> Option<usize> {
        let mut state = self.start();
        for s in symbols {
            state = self.next(state, self.class_of(*s)?)?;
        }
        Some(state)
    }

    pub fn accept(&self, symbols: &[Symbol]) -> bool {
        self.walk(symbols)
            .map_or(false, |state| self.is_accepting(state))
    }

    /// States from which some accepting state is reachable.
    pub fn live_states(&self) -> Vec<bool> {
        let mut reverse = vec![vec![]; self.size()];
        for (id, node) in self.nodes.iter().enumerate() {
            for next in node.trans.iter().flatten() {
                reverse[*next].push(id);
            }
        }

        let mut live = self.accepting();
        let mut q: VecDeque<usize> = (0..self.size()).filter(|id| live[*id]).collect();
        while let Some(id) = q.pop_front() {
            for prev in reverse[id].iter() {
                if !live[*prev] {
                    live[*prev] = true;
                    q.push_back(*prev);
                }
            }
        }
        live
    }

    /// Automaton of the factorial closure: every factor of an accepted string
    /// is accepted.
    pub fn factorial(&self, minimize: bool) -> Dfa {
        let live = self.live_states();

        // nfa node of dfa state `id` is `id + 2`; all of them start and accept
        let mut nodes: Vec<nfa::Node> = (0..self.size() + 2)
            .map(|_| nfa::Node { nexts: vec![] })
            .collect();
        for (id, node) in self.nodes.iter().enumerate() {
            if !live[id] {
                continue;
            }
            nodes[nfa::ROOT_ID].nexts.push(nfa::Edge {
                action: nfa::EdgeAction::Asap,
                next_id: id + 2,
            });
            nodes[id + 2].nexts.push(nfa::Edge {
                action: nfa::EdgeAction::Asap,
                next_id: nfa::SUBMIT_ID,
            });
            for (class, next) in node.trans.iter().enumerate() {
                if let Some(next) = next.filter(|next| live[*next]) {
                    nodes[id + 2].nexts.push(nfa::Edge {
                        action: nfa::EdgeAction::Match(vec![self.classes[class]]),
                        next_id: next + 2,
                    });
                }
            }
        }

        let nfa = Nfa {
            nodes,
            encoding: self.encoding,
        };
        Dfa::compile(&nfa, minimize)
    }
}
