//! Stepping for automata that occupy a set of states at once.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::{
    automaton::graph::{Graph, StateId},
    execution::{ExecutionState, Halt},
};

/// A set of states, ordered so it can be compared and used as a map key.
pub type Frontier = BTreeSet<StateId>;

/// Whether a frontier is closed under epsilon transitions after each move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closure {
    None,
    Epsilon,
}

/// All states reachable from `seed` using only epsilon transitions,
/// including the seed itself.
pub fn epsilon_closure(graph: &Graph, seed: impl IntoIterator<Item = StateId>) -> Frontier {
    let mut closure: Frontier = seed.into_iter().collect();
    let mut stack = closure.iter().copied().collect::<Vec<_>>();

    while let Some(state) = stack.pop() {
        for transition in graph.find_transitions_from_state(state) {
            if transition.is_epsilon() && closure.insert(transition.to_state_id()) {
                stack.push(transition.to_state_id());
            }
        }
    }

    closure
}

/// Memoizes the epsilon closure of single states.
#[derive(Debug, Clone)]
pub struct EpsilonClosures<'a> {
    graph: &'a Graph,
    cache: HashMap<StateId, Frontier>,
}

impl<'a> EpsilonClosures<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        EpsilonClosures {
            graph,
            cache: HashMap::new(),
        }
    }

    pub fn closure_of(&mut self, state: StateId) -> &Frontier {
        let graph = self.graph;
        self.cache
            .entry(state)
            .or_insert_with(|| epsilon_closure(graph, [state]))
    }

    pub fn closure_of_set(&mut self, states: impl IntoIterator<Item = StateId>) -> Frontier {
        let mut closure = Frontier::new();
        for state in states {
            closure.extend(self.closure_of(state).iter().copied());
        }
        closure
    }
}

/// The states reachable from any state in `frontier` by reading `symbol`.
pub fn successors(graph: &Graph, frontier: &Frontier, symbol: char) -> Frontier {
    frontier
        .iter()
        .flat_map(|&state| graph.find_transitions_from_state(state))
        .filter(|t| !t.is_epsilon() && t.symbol() == symbol)
        .map(|t| t.to_state_id())
        .collect()
}

pub fn is_accepting_set(graph: &Graph, frontier: &Frontier) -> bool {
    frontier.iter().any(|&state| graph.is_accepting(state))
}

pub fn start(graph: &Graph, input: &str, closure: Closure) -> ExecutionState<Frontier> {
    let start = graph.expect_start_state();
    let frontier = match closure {
        Closure::None => Frontier::from([start]),
        Closure::Epsilon => epsilon_closure(graph, [start]),
    };

    let mut state = ExecutionState::new(input, frontier);

    if state.is_at_end() {
        let accepted = is_accepting_set(graph, state.current());
        state.finish(Halt::EndOfInput, accepted);
    }

    state
}

pub fn step(graph: &Graph, state: &mut ExecutionState<Frontier>, closure: Closure) {
    if state.is_finished() {
        return;
    }

    let Some(symbol) = state.current_symbol() else {
        let accepted = is_accepting_set(graph, state.current());
        state.finish(Halt::EndOfInput, accepted);
        return;
    };

    let mut next = successors(graph, state.current(), symbol);
    if closure == Closure::Epsilon {
        next = epsilon_closure(graph, next);
    }

    let empty = next.is_empty();
    state.advance(next);

    if empty {
        state.finish(Halt::EmptyFrontier, false);
    } else if state.is_at_end() {
        let accepted = is_accepting_set(graph, state.current());
        state.finish(Halt::EndOfInput, accepted);
    }
}
