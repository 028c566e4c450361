use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{Dfa, Node};
use crate::encoding::Symbol;
use crate::sfa::nfa::{self, Nfa};

type IndexSet = BTreeSet<usize>;

pub(crate) struct Builder<'a> {
    nfa: &'a Nfa,
    classes: Vec<(Symbol, Symbol)>,
    // per nfa node and edge: first and last class covered by a Match edge
    edge_classes: Vec<Vec<Option<(usize, usize)>>>,
    dfa_nodes: Vec<Node>,
    dfa_indexmap: BTreeMap<IndexSet, usize>,
}

impl<'a> Builder<'a> {
    pub fn build(nfa: &'a Nfa) -> Dfa {
        let classes = Self::build_classes(nfa);
        let edge_classes: Vec<Vec<Option<(usize, usize)>>> = nfa
            .nodes
            .iter()
            .map(|node| {
                node.nexts
                    .iter()
                    .map(|edge| match &edge.action {
                        nfa::EdgeAction::Asap => None,
                        nfa::EdgeAction::Match(ranges) => Self::covered(&classes, ranges),
                    })
                    .collect()
            })
            .collect();

        let mut builder = Builder {
            nfa,
            classes,
            edge_classes,
            dfa_nodes: Vec::new(),
            dfa_indexmap: BTreeMap::new(),
        };
        builder.build_();

        Dfa {
            classes: builder.classes,
            nodes: builder.dfa_nodes,
            encoding: nfa.encoding,
        }
    }

    /// Splits the symbols used by any edge into maximal intervals on which
    /// every edge agrees.
    fn build_classes(nfa: &Nfa) -> Vec<(Symbol, Symbol)> {
        let mut cuts = BTreeSet::new();
        let mut used: Vec<(Symbol, Symbol)> = vec![];
        for node in nfa.nodes.iter() {
            for edge in node.nexts.iter() {
                if let nfa::EdgeAction::Match(ranges) = &edge.action {
                    for (lo, hi) in ranges.iter() {
                        cuts.insert(*lo as u64);
                        cuts.insert(*hi as u64 + 1);
                        used.push((*lo, *hi));
                    }
                }
            }
        }
        for (lo, hi) in nfa.encoding.alphabet() {
            cuts.insert(*lo as u64);
            cuts.insert(*hi as u64 + 1);
        }
        used.sort_unstable();

        let cuts: Vec<u64> = cuts.into_iter().collect();
        cuts.windows(2)
            .map(|w| (w[0] as Symbol, (w[1] - 1) as Symbol))
            .filter(|(lo, _)| {
                let i = used.partition_point(|(a, _)| a <= lo);
                used[..i].iter().any(|(_, hi)| hi >= lo)
            })
            .collect()
    }

    fn covered(classes: &[(Symbol, Symbol)], ranges: &[(Symbol, Symbol)]) -> Option<(usize, usize)> {
        let (first, last) = (ranges.first()?.0, ranges.last()?.1);
        let begin = classes.partition_point(|(_, hi)| *hi < first);
        let end = classes.partition_point(|(lo, _)| *lo <= last);
        match begin < end {
            true => Some((begin, end - 1)),
            false => None,
        }
    }

    fn build_(&mut self) {
        let mut q = VecDeque::new();
        {
            let mut index = IndexSet::new();
            index.insert(nfa::ROOT_ID);
            index = self.resolve_empty_transition(index);
            self.dfa_indexmap.insert(index.clone(), 0);
            q.push_back(index);
        }

        while let Some(index) = q.pop_front() {
            let is_match = index.contains(&nfa::SUBMIT_ID);

            let mut trans = Vec::with_capacity(self.classes.len());
            for next_index in self.build_trans_map(&index) {
                if next_index.is_empty() {
                    trans.push(None);
                    continue;
                }

                let next_id = match self.dfa_indexmap.get(&next_index) {
                    Some(id) => *id,
                    None => {
                        let id = self.dfa_indexmap.len();
                        self.dfa_indexmap.insert(next_index.clone(), id);
                        q.push_back(next_index);
                        id
                    }
                };
                trans.push(Some(next_id));
            }

            self.dfa_nodes.push(Node { trans, is_match });
        }
    }

    fn build_trans_map(&self, index: &IndexSet) -> Vec<IndexSet> {
        let mut table = vec![IndexSet::new(); self.classes.len()];

        for i in index.iter() {
            for (edge, covered) in self.nfa.nodes[*i].nexts.iter().zip(&self.edge_classes[*i]) {
                let (ranges, (first, last)) = match (&edge.action, covered) {
                    (nfa::EdgeAction::Match(ranges), Some(covered)) => (ranges, *covered),
                    _ => continue,
                };
                for class in first..=last {
                    let lo = self.classes[class].0;
                    if ranges.iter().any(|(a, b)| *a <= lo && lo <= *b) {
                        table[class].insert(edge.next_id);
                    }
                }
            }
        }

        table
            .into_iter()
            .map(|index| self.resolve_empty_transition(index))
            .collect()
    }

    fn resolve_empty_transition(&self, index: IndexSet) -> IndexSet {
        let mut result_index = BTreeSet::new();

        let mut q: VecDeque<_> = index.into_iter().collect();
        while let Some(i) = q.pop_front() {
            if !result_index.insert(i) {
                continue;
            }

            for edge in self.nfa.nodes[i].nexts.iter() {
                if let nfa::EdgeAction::Asap = edge.action {
                    q.push_back(edge.next_id);
                }
            }
        }

        result_index
    }
}
