use std::collections::BTreeSet;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::Matrix;

/// Strongly connected components of a transition graph.
///
/// Components are numbered in the order `tarjan_scc` completes them,
/// which is a reverse topological order of the condensation: every edge
/// between two components goes from a higher index to a lower one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scc {
    components: Vec<BTreeSet<usize>>,
    component_of: Vec<usize>,
    cyclic: Vec<bool>,
    // condensation edges, deduplicated
    successors: Vec<BTreeSet<usize>>,
}

impl Scc {
    pub fn new(matrix: &Matrix) -> Self {
        let (components, component_of) = tarjan(matrix);

        let mut cyclic = vec![false; components.len()];
        let mut successors = vec![BTreeSet::new(); components.len()];
        for i in 0..matrix.size() {
            for (j, _) in matrix.successors(i) {
                let (a, b) = (component_of[i], component_of[j]);
                if a == b {
                    cyclic[a] = true;
                } else {
                    successors[a].insert(b);
                }
            }
        }

        Scc {
            components,
            component_of,
            cyclic,
            successors,
        }
    }

    pub fn components(&self) -> &[BTreeSet<usize>] {
        &self.components
    }

    pub fn component_of(&self, state: usize) -> usize {
        self.component_of[state]
    }

    /// Whether the component carries at least one edge inside itself.
    pub fn is_cyclic(&self, component: usize) -> bool {
        self.cyclic[component]
    }

    pub fn successors(&self, component: usize) -> &BTreeSet<usize> {
        &self.successors[component]
    }

    /// Components reachable from the component of `start`.
    pub fn reachable(&self, start: usize) -> Vec<bool> {
        let mut reachable = vec![false; self.components.len()];
        reachable[self.component_of[start]] = true;
        // topological order is the reverse of the completion order
        for c in (0..self.components.len()).rev() {
            if reachable[c] {
                for next in self.successors[c].iter() {
                    reachable[*next] = true;
                }
            }
        }
        reachable
    }

    /// Components from which some state flagged in `accepting` is reachable.
    pub fn co_reachable(&self, accepting: &[bool]) -> Vec<bool> {
        let mut co_reachable = vec![false; self.components.len()];
        for c in 0..self.components.len() {
            co_reachable[c] = self.components[c].iter().any(|s| accepting[*s])
                || self.successors[c].iter().any(|next| co_reachable[*next]);
        }
        co_reachable
    }

    /// Cyclic components lying on some path from `start` to acceptance;
    /// the language is infinite iff there is one.
    pub fn growth_components(&self, start: usize, accepting: &[bool]) -> Vec<usize> {
        let reachable = self.reachable(start);
        let co_reachable = self.co_reachable(accepting);
        (0..self.components.len())
            .filter(|c| reachable[*c] && co_reachable[*c] && self.cyclic[*c])
            .collect()
    }
}

/// Tarjan over the nonzero entries of `matrix`; petgraph emits the
/// components in postorder.
fn tarjan(matrix: &Matrix) -> (Vec<BTreeSet<usize>>, Vec<usize>) {
    let size = matrix.size();
    let mut graph = DiGraph::<(), u64>::with_capacity(size, size);
    for _ in 0..size {
        graph.add_node(());
    }
    for i in 0..size {
        for (j, weight) in matrix.successors(i) {
            graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), weight);
        }
    }

    let mut component_of = vec![0; size];
    let components: Vec<BTreeSet<usize>> = tarjan_scc(&graph)
        .into_iter()
        .enumerate()
        .map(|(c, nodes)| {
            nodes
                .into_iter()
                .map(|node| {
                    component_of[node.index()] = c;
                    node.index()
                })
                .collect()
        })
        .collect();

    (components, component_of)
}
