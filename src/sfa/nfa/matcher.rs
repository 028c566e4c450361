use std::collections::{BTreeSet, VecDeque};

use super::{EdgeAction, Node, ROOT_ID};
use crate::encoding::Symbol;

pub(crate) struct Matcher<'a> {
    nodes: &'a [Node],
    success_id: usize,
}

impl<'a> Matcher<'a> {
    pub fn new(nodes: &'a [Node], success_id: usize) -> Self {
        Matcher { nodes, success_id }
    }

    pub fn execute(&self, symbols: &[Symbol]) -> bool {
        let mut current = BTreeSet::new();
        current.insert(ROOT_ID);
        current = self.solve_asap(current);

        for s in symbols {
            if current.is_empty() {
                return false;
            }
            current = self.solve_match(*s, &current);
            current = self.solve_asap(current);
        }

        current.contains(&self.success_id)
    }

    fn solve_match(&self, s: Symbol, current_ids: &BTreeSet<usize>) -> BTreeSet<usize> {
        let mut next_ids = BTreeSet::new();
        for id in current_ids {
            for edge in &self.nodes[*id].nexts {
                if let EdgeAction::Match(ranges) = &edge.action {
                    if ranges.iter().any(|(lo, hi)| *lo <= s && s <= *hi) {
                        next_ids.insert(edge.next_id);
                    }
                }
            }
        }
        next_ids
    }

    fn solve_asap(&self, current_ids: BTreeSet<usize>) -> BTreeSet<usize> {
        let mut next_ids = BTreeSet::new();
        let mut queue_ids: VecDeque<usize> = current_ids.into_iter().collect();
        while let Some(id) = queue_ids.pop_front() {
            if !next_ids.insert(id) {
                continue;
            }

            for edge in &self.nodes[id].nexts {
                if let EdgeAction::Asap = edge.action {
                    queue_ids.push_back(edge.next_id);
                }
            }
        }
        next_ids
    }
}
