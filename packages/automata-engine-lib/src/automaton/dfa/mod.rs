use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        AutomatonKind, Execute, GraphAutomaton, epsilon_issues,
        graph::{Graph, StateId, display_symbol},
        stack_issues,
    },
    execution::{ExecutionState, deterministic},
};

pub mod minimization;

/// A deterministic finite automaton. Missing transitions are allowed, reading
/// a symbol without a transition rejects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dfa {
    graph: Graph,
}

impl Dfa {
    pub fn new() -> Self {
        Dfa::default()
    }

    /// The successor of `from` on `symbol`, if any.
    pub fn successor(&self, from: StateId, symbol: char) -> Option<StateId> {
        deterministic::successor(&self.graph, from, symbol)
    }
}

/// Pairs `(from, symbol)` that have more than one outgoing transition.
pub(crate) fn determinism_issues(graph: &Graph) -> Vec<String> {
    graph
        .transitions()
        .iter()
        .filter(|t| !t.is_epsilon())
        .counts_by(|t| (t.from_state_id(), t.symbol()))
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .sorted()
        .map(|((from, symbol), count)| {
            format!(
                "State {from} has {count} transitions on symbol '{}', a DFA allows at most one",
                display_symbol(symbol)
            )
        })
        .collect()
}

impl GraphAutomaton for Dfa {
    const KIND: AutomatonKind = AutomatonKind::Dfa;

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    fn from_graph(graph: Graph) -> Self {
        Dfa { graph }
    }

    fn validate(&self) -> Vec<String> {
        let mut issues = self.graph.structural_issues();
        issues.extend(epsilon_issues(&self.graph, Self::KIND));
        issues.extend(stack_issues(&self.graph, Self::KIND));
        issues.extend(determinism_issues(&self.graph));
        issues
    }
}

impl Execute for Dfa {
    type Configuration = StateId;

    fn start_execution(&self, input: &str) -> ExecutionState<StateId> {
        deterministic::start(&self.graph, input)
    }

    fn step_forward(&self, state: &mut ExecutionState<StateId>) {
        deterministic::step(&self.graph, state);
    }
}
