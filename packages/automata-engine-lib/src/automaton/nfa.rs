use std::collections::{BTreeMap, VecDeque};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        AutomatonKind, Execute, GraphAutomaton,
        dfa::Dfa,
        epsilon_issues,
        graph::{Graph, State, StateId, Transition},
        stack_issues,
    },
    execution::{
        ExecutionState,
        frontier::{self, Closure, Frontier},
    },
};

/// A nondeterministic finite automaton without epsilon transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nfa {
    graph: Graph,
}

impl Nfa {
    pub fn new() -> Self {
        Nfa::default()
    }

    /// Converts this NFA into an equivalent DFA via subset construction.
    pub fn to_dfa(&self) -> Dfa {
        self.to_dfa_with_mapping().0
    }

    /// Subset construction. Every DFA state stands for one reachable
    /// frontier, the returned map says which. The start frontier becomes
    /// state 0, further ids follow in discovery order. The empty frontier is
    /// not materialized, a missing transition already rejects.
    pub fn to_dfa_with_mapping(&self) -> (Dfa, BTreeMap<StateId, Frontier>) {
        determinize(&self.graph, Closure::None)
    }
}

/// Subset construction over `graph`. With [`Closure::Epsilon`] every
/// frontier is closed under epsilon transitions first.
pub(crate) fn determinize(graph: &Graph, closure: Closure) -> (Dfa, BTreeMap<StateId, Frontier>) {
    let start = graph.expect_start_state();
    let alphabet = graph.alphabet();

    let close = |frontier: Frontier| match closure {
        Closure::None => frontier,
        Closure::Epsilon => frontier::epsilon_closure(graph, frontier),
    };

    let mut dfa = Graph::new();
    let mut state_map: HashMap<Frontier, StateId> = HashMap::new();
    let mut frontiers = BTreeMap::new();
    let mut worklist = VecDeque::new();

    let start_frontier = close(Frontier::from([start]));
    dfa.add_state(State::new(
        0,
        true,
        frontier::is_accepting_set(graph, &start_frontier),
    ));
    state_map.insert(start_frontier.clone(), 0);
    frontiers.insert(0, start_frontier.clone());
    worklist.push_back(start_frontier);

    while let Some(current) = worklist.pop_front() {
        let from = state_map[&current];

        for &symbol in &alphabet {
            let target = close(frontier::successors(graph, &current, symbol));
            if target.is_empty() {
                continue;
            }

            let to = match state_map.get(&target) {
                Some(&id) => id,
                None => {
                    let id = state_map.len() as StateId;
                    dfa.add_state(State::new(
                        id,
                        false,
                        frontier::is_accepting_set(graph, &target),
                    ));
                    state_map.insert(target.clone(), id);
                    frontiers.insert(id, target.clone());
                    worklist.push_back(target);
                    id
                }
            };

            dfa.add_transition(Transition::new(from, to, symbol));
        }
    }

    tracing::debug!(
        "subset construction: {} states became {} DFA states",
        graph.state_count(),
        dfa.state_count()
    );

    (Dfa::from_graph(dfa), frontiers)
}

impl GraphAutomaton for Nfa {
    const KIND: AutomatonKind = AutomatonKind::Nfa;

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    fn from_graph(graph: Graph) -> Self {
        Nfa { graph }
    }

    fn validate(&self) -> Vec<String> {
        let mut issues = self.graph.structural_issues();
        issues.extend(epsilon_issues(&self.graph, Self::KIND));
        issues.extend(stack_issues(&self.graph, Self::KIND));
        issues
    }
}

impl Execute for Nfa {
    type Configuration = Frontier;

    fn start_execution(&self, input: &str) -> ExecutionState<Frontier> {
        frontier::start(&self.graph, input, Closure::None)
    }

    fn step_forward(&self, state: &mut ExecutionState<Frontier>) {
        frontier::step(&self.graph, state, Closure::None);
    }
}
