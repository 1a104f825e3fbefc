use std::{collections::BTreeSet, fmt::Display};

use hashbrown::HashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a state. Ids are chosen by the caller and only need to be
/// unique within one automaton.
pub type StateId = i32;

/// The reserved symbol that labels epsilon transitions. It is never part of
/// an alphabet.
pub const EPSILON: char = '\0';

/// Renders a symbol for humans, showing epsilon as `ε`.
pub fn display_symbol(symbol: char) -> String {
    if symbol == EPSILON {
        "ε".to_string()
    } else {
        symbol.to_string()
    }
}

/// Violations of the structural graph invariants. These indicate a bug in
/// the code assembling the graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("a state with id {0} already exists")]
    DuplicateState(StateId),
    #[error("state {new} cannot become a start state, state {existing} already is one")]
    SecondStartState { existing: StateId, new: StateId },
    #[error("no state with id {0} exists")]
    UnknownState(StateId),
    #[error("transition {from} -> {to} references the unknown state {missing}")]
    UnknownEndpoint {
        from: StateId,
        to: StateId,
        missing: StateId,
    },
    #[error("the automaton has no start state")]
    NoStartState,
    #[error("the automaton has more than one start state: {}", .0.iter().join(", "))]
    MultipleStartStates(Vec<StateId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: StateId,
    pub is_start: bool,
    pub is_accepting: bool,
}

impl State {
    pub fn new(id: StateId, is_start: bool, is_accepting: bool) -> Self {
        State {
            id,
            is_start,
            is_accepting,
        }
    }

    pub fn accepting(id: StateId) -> Self {
        State::new(id, false, true)
    }

    pub fn non_accepting(id: StateId) -> Self {
        State::new(id, false, false)
    }

    /// Marks this state as the start state.
    pub fn into_start(mut self) -> Self {
        self.is_start = true;
        self
    }
}

/// A labelled edge between two states.
///
/// Stack fields are only meaningful for pushdown automata. A missing pop
/// condition and an epsilon pop condition mean the same thing, so the
/// accessor [`Transition::stack_pop`] never returns [`EPSILON`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTransition")]
pub struct Transition {
    from_state_id: StateId,
    to_state_id: StateId,
    symbol: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stack_pop: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stack_push: Option<String>,
}

impl Transition {
    pub fn new(from: StateId, to: StateId, symbol: char) -> Self {
        Transition {
            from_state_id: from,
            to_state_id: to,
            symbol,
            stack_pop: None,
            stack_push: None,
        }
    }

    pub fn epsilon(from: StateId, to: StateId) -> Self {
        Transition::new(from, to, EPSILON)
    }

    /// Creates a pushdown transition. `push` is placed on the stack so that
    /// its first character ends up on top.
    pub fn pda(
        from: StateId,
        to: StateId,
        symbol: char,
        pop: Option<char>,
        push: Option<&str>,
    ) -> Self {
        let push: Option<String> = push
            .map(|p| p.chars().filter(|c| *c != EPSILON).collect::<String>())
            .filter(|p| !p.is_empty());

        Transition {
            from_state_id: from,
            to_state_id: to,
            symbol,
            stack_pop: pop.filter(|c| *c != EPSILON),
            stack_push: push,
        }
    }

    pub fn from_state_id(&self) -> StateId {
        self.from_state_id
    }

    pub fn to_state_id(&self) -> StateId {
        self.to_state_id
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn is_epsilon(&self) -> bool {
        self.symbol == EPSILON
    }

    pub fn stack_pop(&self) -> Option<char> {
        self.stack_pop.filter(|c| *c != EPSILON)
    }

    pub fn stack_push(&self) -> Option<&str> {
        self.stack_push.as_deref().filter(|p| !p.is_empty())
    }

    pub fn has_stack_effect(&self) -> bool {
        self.stack_pop().is_some() || self.stack_push().is_some()
    }
}

/// The wire form of a [`Transition`]. Loading goes through
/// [`Transition::pda`] so epsilon pops and empty pushes become `None`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransition {
    from_state_id: StateId,
    to_state_id: StateId,
    symbol: char,
    #[serde(default)]
    stack_pop: Option<char>,
    #[serde(default)]
    stack_push: Option<String>,
}

impl From<RawTransition> for Transition {
    fn from(raw: RawTransition) -> Self {
        Transition::pda(
            raw.from_state_id,
            raw.to_state_id,
            raw.symbol,
            raw.stack_pop,
            raw.stack_push.as_deref(),
        )
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -{}",
            self.from_state_id,
            display_symbol(self.symbol)
        )?;

        if self.has_stack_effect() {
            write!(
                f,
                ", {}/{}",
                display_symbol(self.stack_pop().unwrap_or(EPSILON)),
                self.stack_push().unwrap_or("ε")
            )?;
        }

        write!(f, "-> {}", self.to_state_id)
    }
}

/// The state/transition arena every automaton variant is built on.
///
/// States and transitions keep their insertion order, which is also the
/// order they are serialized in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    states: Vec<State>,
    transitions: Vec<Transition>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    pub fn try_add_state(&mut self, state: State) -> Result<(), GraphError> {
        if self.has_state(state.id) {
            return Err(GraphError::DuplicateState(state.id));
        }

        if state.is_start
            && let Some(existing) = self.start_state()
        {
            return Err(GraphError::SecondStartState {
                existing,
                new: state.id,
            });
        }

        self.states.push(state);
        Ok(())
    }

    /// Adds a state, panicking on a duplicate id or a second start state.
    pub fn add_state(&mut self, state: State) {
        if let Err(e) = self.try_add_state(state) {
            panic!("{e}");
        }
    }

    /// Removes a state together with every transition touching it.
    pub fn remove_state(&mut self, id: StateId) -> Option<State> {
        let index = self.states.iter().position(|s| s.id == id)?;
        self.transitions
            .retain(|t| t.from_state_id != id && t.to_state_id != id);
        Some(self.states.remove(index))
    }

    /// Makes `id` the only start state.
    pub fn try_set_start_state(&mut self, id: StateId) -> Result<(), GraphError> {
        if !self.has_state(id) {
            return Err(GraphError::UnknownState(id));
        }

        for state in self.states.iter_mut() {
            state.is_start = state.id == id;
        }

        Ok(())
    }

    pub fn set_start_state(&mut self, id: StateId) {
        if let Err(e) = self.try_set_start_state(id) {
            panic!("{e}");
        }
    }

    pub fn try_set_accepting(&mut self, id: StateId, accepting: bool) -> Result<(), GraphError> {
        let state = self
            .states
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(GraphError::UnknownState(id))?;
        state.is_accepting = accepting;
        Ok(())
    }

    pub fn set_accepting(&mut self, id: StateId, accepting: bool) {
        if let Err(e) = self.try_set_accepting(id, accepting) {
            panic!("{e}");
        }
    }

    pub fn try_add_transition(&mut self, transition: Transition) -> Result<(), GraphError> {
        for endpoint in [transition.from_state_id, transition.to_state_id] {
            if !self.has_state(endpoint) {
                return Err(GraphError::UnknownEndpoint {
                    from: transition.from_state_id,
                    to: transition.to_state_id,
                    missing: endpoint,
                });
            }
        }

        self.transitions.push(transition);
        Ok(())
    }

    /// Adds a transition, panicking if one of its endpoints does not exist.
    pub fn add_transition(&mut self, transition: Transition) {
        if let Err(e) = self.try_add_transition(transition) {
            panic!("{e}");
        }
    }

    /// Removes the first transition equal to `transition`. Returns whether
    /// one was found.
    pub fn remove_transition(&mut self, transition: &Transition) -> bool {
        match self.transitions.iter().position(|t| t == transition) {
            Some(index) => {
                self.transitions.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn find_transitions_from_state(&self, id: StateId) -> impl Iterator<Item = &Transition> {
        self.transitions
            .iter()
            .filter(move |t| t.from_state_id == id)
    }

    pub fn find_transitions_for_symbol(&self, symbol: char) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.symbol == symbol)
    }

    /// Checks that exactly one start state exists and returns it.
    pub fn validate_start_state(&self) -> Result<StateId, GraphError> {
        let starts = self
            .states
            .iter()
            .filter(|s| s.is_start)
            .map(|s| s.id)
            .collect_vec();

        match starts.as_slice() {
            [] => Err(GraphError::NoStartState),
            [start] => Ok(*start),
            _ => Err(GraphError::MultipleStartStates(starts)),
        }
    }

    /// Like [`Graph::validate_start_state`], but panics. Execution entry
    /// points use this, running a graph without a unique start is a bug.
    pub fn expect_start_state(&self) -> StateId {
        match self.validate_start_state() {
            Ok(start) => start,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn start_state(&self) -> Option<StateId> {
        self.states.iter().find(|s| s.is_start).map(|s| s.id)
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    pub fn has_state(&self, id: StateId) -> bool {
        self.state(id).is_some()
    }

    pub fn is_accepting(&self, id: StateId) -> bool {
        self.state(id).is_some_and(|s| s.is_accepting)
    }

    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> {
        self.states
            .iter()
            .filter(|s| s.is_accepting)
            .map(|s| s.id)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// The sorted set of non-epsilon symbols used by any transition.
    pub fn alphabet(&self) -> Vec<char> {
        self.transitions
            .iter()
            .filter(|t| !t.is_epsilon())
            .map(|t| t.symbol)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Reports violations of the structural invariants. A graph assembled
    /// through the `add_*` methods never has any, but a deserialized one
    /// might.
    pub fn structural_issues(&self) -> Vec<String> {
        let mut issues = vec![];

        let mut seen = HashMap::new();
        for state in &self.states {
            *seen.entry(state.id).or_insert(0usize) += 1;
        }
        for (id, count) in seen.iter().sorted() {
            if *count > 1 {
                issues.push(format!("State id {id} is used by {count} states"));
            }
        }

        if let Err(e) = self.validate_start_state() {
            issues.push(capitalize(&e.to_string()));
        }

        for transition in &self.transitions {
            for endpoint in [transition.from_state_id, transition.to_state_id] {
                if !self.has_state(endpoint) {
                    issues.push(format!(
                        "Transition {transition} references the unknown state {endpoint}"
                    ));
                }
            }
        }

        issues
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
