use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        AutomatonKind, Execute, GraphAutomaton,
        dfa::Dfa,
        graph::{Graph, State, StateId, Transition},
        nfa::{Nfa, determinize},
        stack_issues,
    },
    execution::{
        ExecutionState,
        frontier::{self, Closure, EpsilonClosures, Frontier},
    },
    regex::{RegexError, build_epsilon_nfa_from_regex},
};

/// A nondeterministic finite automaton that may move along epsilon
/// transitions without reading input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpsilonNfa {
    graph: Graph,
}

impl EpsilonNfa {
    pub fn new() -> Self {
        EpsilonNfa::default()
    }

    /// Compiles a regular expression, see [`build_epsilon_nfa_from_regex`].
    pub fn from_regex(pattern: &str) -> Result<Self, RegexError> {
        build_epsilon_nfa_from_regex(pattern)
    }

    /// All states reachable from `state` using only epsilon transitions.
    pub fn epsilon_closure(&self, state: StateId) -> Frontier {
        frontier::epsilon_closure(&self.graph, [state])
    }

    /// Removes all epsilon transitions. State ids are kept. A state reads
    /// `a` into every state of the closure of the `a`-successors of its own
    /// closure, and accepts if its closure contains an accepting state.
    pub fn to_nfa(&self) -> Nfa {
        let alphabet = self.graph.alphabet();
        let mut closures = EpsilonClosures::new(&self.graph);

        let mut graph = Graph::new();
        let mut transitions = BTreeSet::new();

        for state in self.graph.states() {
            let closure = closures.closure_of(state.id).clone();

            graph.add_state(State::new(
                state.id,
                state.is_start,
                frontier::is_accepting_set(&self.graph, &closure),
            ));

            for &symbol in &alphabet {
                let moved = frontier::successors(&self.graph, &closure, symbol);
                for target in closures.closure_of_set(moved) {
                    transitions.insert((state.id, symbol, target));
                }
            }
        }

        for (from, symbol, to) in transitions {
            graph.add_transition(Transition::new(from, to, symbol));
        }

        tracing::debug!(
            "epsilon elimination: {} transitions became {}",
            self.graph.transition_count(),
            graph.transition_count()
        );

        Nfa::from_graph(graph)
    }

    /// Subset construction over epsilon closed frontiers. Accepts the same
    /// language as `self.to_nfa().to_dfa()`.
    pub fn to_dfa(&self) -> Dfa {
        self.to_dfa_with_mapping().0
    }

    pub fn to_dfa_with_mapping(&self) -> (Dfa, BTreeMap<StateId, Frontier>) {
        determinize(&self.graph, Closure::Epsilon)
    }
}

impl GraphAutomaton for EpsilonNfa {
    const KIND: AutomatonKind = AutomatonKind::EpsilonNfa;

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    fn from_graph(graph: Graph) -> Self {
        EpsilonNfa { graph }
    }

    fn validate(&self) -> Vec<String> {
        let mut issues = self.graph.structural_issues();
        issues.extend(stack_issues(&self.graph, Self::KIND));
        issues
    }
}

impl Execute for EpsilonNfa {
    type Configuration = Frontier;

    fn start_execution(&self, input: &str) -> ExecutionState<Frontier> {
        frontier::start(&self.graph, input, Closure::Epsilon)
    }

    fn step_forward(&self, state: &mut ExecutionState<Frontier>) {
        frontier::step(&self.graph, state, Closure::Epsilon);
    }
}
