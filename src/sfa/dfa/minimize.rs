use std::collections::{BTreeMap, VecDeque};

use log::trace;

use super::{Dfa, Node};

// A state's group together with the groups its transitions land in.
type Signature = (usize, Vec<Option<usize>>);

impl Dfa {
    /// Minimize the DFA.
    /// Dead states are pruned first, then the partition of the remaining
    /// states is refined until it is stable (Moore's algorithm). The quotient
    /// is renumbered breadth first from the start state, visiting classes in
    /// ascending order, and finally adjacent classes that behave the same
    /// everywhere are merged.
    pub(crate) fn minimize(&self) -> Dfa {
        let live = self.live_states();
        if !live[self.start()] {
            trace!("start state is dead, the language is empty");
            return Dfa {
                classes: vec![],
                nodes: vec![Node {
                    trans: vec![],
                    is_match: false,
                }],
                encoding: self.encoding,
            };
        }

        let trans: Vec<Vec<Option<usize>>> = self
            .nodes
            .iter()
            .map(|node| {
                node.trans
                    .iter()
                    .map(|next| next.filter(|next| live[*next]))
                    .collect()
            })
            .collect();

        let mut group_of: Vec<Option<usize>> = (0..self.size())
            .map(|id| live[id].then(|| self.nodes[id].is_match as usize))
            .collect();
        let mut group_count = {
            let mut groups: Vec<usize> = group_of.iter().flatten().copied().collect();
            groups.sort_unstable();
            groups.dedup();
            groups.len()
        };

        loop {
            let mut signatures: BTreeMap<Signature, usize> = BTreeMap::new();
            let mut next_group_of = vec![None; self.size()];
            for id in 0..self.size() {
                let group = match group_of[id] {
                    Some(group) => group,
                    None => continue,
                };
                let signature = (
                    group,
                    trans[id]
                        .iter()
                        .map(|next| next.and_then(|next| group_of[next]))
                        .collect(),
                );
                let len = signatures.len();
                next_group_of[id] = Some(*signatures.entry(signature).or_insert(len));
            }

            trace!("partition refined: {} -> {} groups", group_count, signatures.len());
            group_of = next_group_of;
            if signatures.len() == group_count {
                break;
            }
            group_count = signatures.len();
        }

        self.create_from_partition(&trans, &group_of, group_count)
            .merge_classes()
    }

    fn create_from_partition(
        &self,
        trans: &[Vec<Option<usize>>],
        group_of: &[Option<usize>],
        group_count: usize,
    ) -> Dfa {
        // the first member of every group represents it
        let mut representative = vec![None; group_count];
        for (id, group) in group_of.iter().enumerate() {
            if let Some(group) = group {
                representative[*group].get_or_insert(id);
            }
        }

        let mut new_id: Vec<Option<usize>> = vec![None; group_count];
        let mut order = vec![];
        let mut q = VecDeque::new();
        if let Some(start) = group_of[self.start()] {
            new_id[start] = Some(0);
            order.push(start);
            q.push_back(start);
        }
        while let Some(group) = q.pop_front() {
            let id = match representative[group] {
                Some(id) => id,
                None => continue,
            };
            for next in trans[id].iter().flatten() {
                if let Some(next_group) = group_of[*next] {
                    if new_id[next_group].is_none() {
                        new_id[next_group] = Some(order.len());
                        order.push(next_group);
                        q.push_back(next_group);
                    }
                }
            }
        }

        let nodes = order
            .iter()
            .filter_map(|group| representative[*group])
            .map(|id| Node {
                trans: trans[id]
                    .iter()
                    .map(|next| {
                        next.and_then(|next| group_of[next])
                            .and_then(|group| new_id[group])
                    })
                    .collect(),
                is_match: self.nodes[id].is_match,
            })
            .collect();

        Dfa {
            classes: self.classes.clone(),
            nodes,
            encoding: self.encoding,
        }
    }

    /// Merges neighbouring classes whose columns are identical in every state.
    /// Classes that reject everywhere are dropped.
    fn merge_classes(self) -> Dfa {
        let column = |class: usize| -> Vec<Option<usize>> {
            self.nodes.iter().map(|node| node.trans[class]).collect()
        };

        let mut kept: Vec<usize> = vec![];
        let mut classes: Vec<(u32, u32)> = vec![];
        for class in 0..self.classes.len() {
            let current = column(class);
            if current.iter().all(Option::is_none) {
                continue;
            }
            match (kept.last(), classes.last_mut()) {
                (Some(prev), Some(last))
                    if last.1 + 1 == self.classes[class].0 && column(*prev) == current =>
                {
                    last.1 = self.classes[class].1;
                }
                _ => {
                    kept.push(class);
                    classes.push(self.classes[class]);
                }
            }
        }

        let nodes = self
            .nodes
            .iter()
            .map(|node| Node {
                trans: kept.iter().map(|class| node.trans[*class]).collect(),
                is_match: node.is_match,
            })
            .collect();

        Dfa {
            classes,
            nodes,
            encoding: self.encoding,
        }
    }
}
