use std::collections::BTreeSet;

use petgraph::{graphmap::DiGraphMap, visit::Bfs};
use serde::{Deserialize, Serialize};

use crate::automaton::{
    GraphAutomaton,
    dfa::{Dfa, minimization::DfaMinimizationTable},
    graph::{StateId, Transition},
};

/// All states reachable from `start` over `transitions`, `start` included.
/// Epsilon transitions count as edges like any other.
pub fn reachable_states(transitions: &[Transition], start: StateId) -> BTreeSet<StateId> {
    let mut graph = DiGraphMap::<StateId, ()>::new();
    graph.add_node(start);
    for transition in transitions {
        graph.add_edge(transition.from_state_id(), transition.to_state_id(), ());
    }

    let mut reachable = BTreeSet::new();
    let mut bfs = Bfs::new(&graph, start);
    while let Some(state) = bfs.next(&graph) {
        reachable.insert(state);
    }

    reachable
}

/// State counts before and after minimizing a DFA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimizationAnalysis {
    pub original: usize,
    pub reachable: usize,
    pub minimized: usize,
}

impl MinimizationAnalysis {
    pub fn unreachable(&self) -> usize {
        self.original - self.reachable
    }

    pub fn merged(&self) -> usize {
        self.reachable - self.minimized
    }
}

/// Computes how far `dfa` would shrink under minimization without building
/// the minimized automaton.
pub fn analyze_minimization(dfa: &Dfa) -> MinimizationAnalysis {
    let mut table = DfaMinimizationTable::new(dfa);
    let blocks = table.refine();

    MinimizationAnalysis {
        original: dfa.state_count(),
        reachable: table.entries().len(),
        minimized: blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_ignores_disconnected_states() {
        let transitions = vec![
            Transition::new(0, 1, 'a'),
            Transition::epsilon(1, 2),
            Transition::new(3, 0, 'a'),
            Transition::new(4, 4, 'b'),
        ];

        assert_eq!(
            reachable_states(&transitions, 0),
            BTreeSet::from([0, 1, 2])
        );
        assert_eq!(reachable_states(&[], 7), BTreeSet::from([7]));
    }
}
