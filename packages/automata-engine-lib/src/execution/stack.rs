//! Stepping for pushdown automata.
//!
//! A configuration is a control state plus a stack. The stack starts with
//! the [`STACK_BOTTOM`] marker and a run accepts only if it ends in an
//! accepting state with nothing but that marker left on the stack.
//!
//! Epsilon transitions are fired by a closure pass after the start and after
//! every consumed symbol. While input remains, an epsilon transition only
//! fires if no transition can read the next symbol; once the input is
//! exhausted they fire until none applies, even from an accepting
//! configuration.
//! The pass is bounded by [`PdaLimits`], a run that hits a bound is
//! rejected.

use serde::{Deserialize, Serialize};

use crate::{
    automaton::graph::{EPSILON, Graph, StateId, Transition},
    config::PdaLimits,
    execution::{ExecutionState, Halt, LimitKind},
};

/// The marker at the bottom of every stack.
pub const STACK_BOTTOM: char = '#';

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdaConfiguration {
    pub state: StateId,
    /// Bottom first, the top of the stack is the last element.
    pub stack: Vec<char>,
}

impl PdaConfiguration {
    pub fn initial(state: StateId) -> Self {
        PdaConfiguration {
            state,
            stack: vec![STACK_BOTTOM],
        }
    }

    pub fn top(&self) -> Option<char> {
        self.stack.last().copied()
    }

    pub fn stack_top_first(&self) -> impl Iterator<Item = char> + '_ {
        self.stack.iter().rev().copied()
    }

    /// True if only the bottom marker is left.
    pub fn has_empty_stack(&self) -> bool {
        self.stack == [STACK_BOTTOM]
    }

    pub fn can_fire(&self, transition: &Transition) -> bool {
        transition
            .stack_pop()
            .is_none_or(|pop| self.top() == Some(pop))
    }

    /// The stack height after firing `transition`.
    fn stack_len_after(&self, transition: &Transition) -> usize {
        let popped = usize::from(transition.stack_pop().is_some());
        let pushed = transition.stack_push().map_or(0, |p| p.chars().count());
        self.stack.len() - popped.min(self.stack.len()) + pushed
    }

    pub fn fire(&mut self, transition: &Transition) {
        if transition.stack_pop().is_some() {
            self.stack.pop();
        }

        if let Some(push) = transition.stack_push() {
            self.stack.extend(push.chars().rev());
        }

        self.state = transition.to_state_id();
    }
}

pub fn is_accepting_configuration(graph: &Graph, configuration: &PdaConfiguration) -> bool {
    graph.is_accepting(configuration.state) && configuration.has_empty_stack()
}

/// The transition that reads `symbol` (or [`EPSILON`]) in `configuration`.
/// Transitions with a matching pop condition win over ones without.
pub fn select<'g>(
    graph: &'g Graph,
    configuration: &PdaConfiguration,
    symbol: char,
) -> Option<&'g Transition> {
    graph
        .find_transitions_from_state(configuration.state)
        .filter(|t| t.symbol() == symbol && configuration.can_fire(t))
        .min_by_key(|t| t.stack_pop().is_none())
}

pub fn start(graph: &Graph, input: &str, limits: &PdaLimits) -> ExecutionState<PdaConfiguration> {
    let start = graph.expect_start_state();
    let mut state = ExecutionState::new(input, PdaConfiguration::initial(start));

    settle(graph, &mut state, limits);

    state
}

pub fn step(graph: &Graph, state: &mut ExecutionState<PdaConfiguration>, limits: &PdaLimits) {
    if state.is_finished() {
        return;
    }

    let Some(symbol) = state.current_symbol() else {
        settle(graph, state, limits);
        return;
    };

    let Some(transition) = select(graph, state.current(), symbol) else {
        state.finish(Halt::NoTransition, false);
        return;
    };

    let mut next = state.current().clone();
    next.fire(transition);
    state.advance(next);

    settle(graph, state, limits);
}

/// Runs the closure pass and decides acceptance once the input is consumed.
fn settle(graph: &Graph, state: &mut ExecutionState<PdaConfiguration>, limits: &PdaLimits) {
    if let Err(kind) = close(graph, state, limits) {
        tracing::warn!(
            "PDA closure pass stopped at position {} in state {}: {:?} limit exceeded",
            state.position(),
            state.current().state,
            kind
        );
        state.finish(Halt::LimitExceeded(kind), false);
        return;
    }

    if state.is_at_end() {
        let accepted = is_accepting_configuration(graph, state.current());
        state.finish(Halt::EndOfInput, accepted);
    }
}

fn close(
    graph: &Graph,
    state: &mut ExecutionState<PdaConfiguration>,
    limits: &PdaLimits,
) -> Result<(), LimitKind> {
    let max_iterations = *limits.get_max_epsilon_iterations();
    let max_stack_len = limits.get_max_stack_growth().saturating_add(1);
    let mut iterations = 0;

    loop {
        let configuration = state.current();

        if let Some(symbol) = state.current_symbol()
            && select(graph, configuration, symbol).is_some()
        {
            return Ok(());
        }

        let Some(transition) = select(graph, configuration, EPSILON) else {
            return Ok(());
        };

        if iterations >= max_iterations {
            return Err(LimitKind::EpsilonIterations);
        }

        if configuration.stack_len_after(transition) > max_stack_len {
            return Err(LimitKind::StackGrowth);
        }

        iterations += 1;
        state.current_mut().fire(transition);
    }
}
