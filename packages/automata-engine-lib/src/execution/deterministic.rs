//! Stepping for automata that are in exactly one state at a time.

use crate::{
    automaton::graph::{Graph, StateId},
    execution::{ExecutionState, Halt},
};

pub fn start(graph: &Graph, input: &str) -> ExecutionState<StateId> {
    let start = graph.expect_start_state();
    let mut state = ExecutionState::new(input, start);

    if state.is_at_end() {
        state.finish(Halt::EndOfInput, graph.is_accepting(start));
    }

    state
}

/// The unique successor of `from` on `symbol`. If the graph is not
/// deterministic the first matching transition wins.
pub fn successor(graph: &Graph, from: StateId, symbol: char) -> Option<StateId> {
    graph
        .find_transitions_from_state(from)
        .find(|t| !t.is_epsilon() && t.symbol() == symbol)
        .map(|t| t.to_state_id())
}

pub fn step(graph: &Graph, state: &mut ExecutionState<StateId>) {
    if state.is_finished() {
        return;
    }

    let Some(symbol) = state.current_symbol() else {
        let accepted = graph.is_accepting(*state.current());
        state.finish(Halt::EndOfInput, accepted);
        return;
    };

    match successor(graph, *state.current(), symbol) {
        Some(next) => {
            state.advance(next);
            if state.is_at_end() {
                state.finish(Halt::EndOfInput, graph.is_accepting(next));
            }
        }
        None => state.finish(Halt::NoTransition, false),
    }
}
