use std::{collections::BTreeSet, fmt::Debug};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        dfa::Dfa,
        epsilon_nfa::EpsilonNfa,
        graph::{Graph, GraphError, State, StateId, Transition, display_symbol},
        nfa::Nfa,
        pda::Pda,
    },
    execution::{ExecutionState, Halt, stack::PdaConfiguration},
};

pub mod algorithms;
pub mod dfa;
pub mod epsilon_nfa;
pub mod graph;
pub mod nfa;
pub mod pda;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomatonKind {
    Dfa,
    Nfa,
    EpsilonNfa,
    Pda,
}

/// The shared base of every automaton variant: a [`Graph`] plus
/// variant-specific validation rules.
pub trait GraphAutomaton {
    const KIND: AutomatonKind;

    fn graph(&self) -> &Graph;
    fn graph_mut(&mut self) -> &mut Graph;

    fn from_graph(graph: Graph) -> Self
    where
        Self: Sized;

    /// Business-rule problems of this automaton, one message each. An empty
    /// list means the automaton is well formed.
    fn validate(&self) -> Vec<String>;

    /// Assembles an automaton from flat state and transition lists.
    fn from_parts(
        states: impl IntoIterator<Item = State>,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Result<Self, GraphError>
    where
        Self: Sized,
    {
        let mut graph = Graph::new();
        for state in states {
            graph.try_add_state(state)?;
        }
        for transition in transitions {
            graph.try_add_transition(transition)?;
        }
        Ok(Self::from_graph(graph))
    }

    fn add_state(&mut self, state: State) {
        self.graph_mut().add_state(state);
    }

    fn try_add_state(&mut self, state: State) -> Result<(), GraphError> {
        self.graph_mut().try_add_state(state)
    }

    fn set_start_state(&mut self, id: StateId) {
        self.graph_mut().set_start_state(id);
    }

    fn try_set_start_state(&mut self, id: StateId) -> Result<(), GraphError> {
        self.graph_mut().try_set_start_state(id)
    }

    fn add_transition(&mut self, transition: Transition) {
        self.graph_mut().add_transition(transition);
    }

    fn try_add_transition(&mut self, transition: Transition) -> Result<(), GraphError> {
        self.graph_mut().try_add_transition(transition)
    }

    fn remove_transition(&mut self, transition: &Transition) -> bool {
        self.graph_mut().remove_transition(transition)
    }

    fn validate_start_state(&self) -> Result<StateId, GraphError> {
        self.graph().validate_start_state()
    }

    fn state_count(&self) -> usize {
        self.graph().state_count()
    }
}

pub trait Alphabet {
    fn alphabet(&self) -> Vec<char>;
}

impl<T: GraphAutomaton> Alphabet for T {
    fn alphabet(&self) -> Vec<char> {
        self.graph().alphabet()
    }
}

/// Interactive execution: start a run, move through it one symbol at a
/// time in either direction, or run it to completion.
pub trait Execute {
    type Configuration: Debug + Clone + PartialEq;

    fn start_execution(&self, input: &str) -> ExecutionState<Self::Configuration>;

    /// Consumes one symbol. Does nothing once the run is finished.
    fn step_forward(&self, state: &mut ExecutionState<Self::Configuration>);

    /// Undoes the last step. Does nothing at position 0.
    fn step_backward(&self, state: &mut ExecutionState<Self::Configuration>) {
        state.step_backward();
    }

    fn execute_all(&self, state: &mut ExecutionState<Self::Configuration>) {
        while !state.is_finished() {
            self.step_forward(state);
        }
    }

    /// Runs the whole input and reports acceptance.
    fn execute(&self, input: &str) -> bool {
        let mut state = self.start_execution(input);
        self.execute_all(&mut state);
        state.is_accepted().unwrap_or(false)
    }
}

/// The basic trait for anything that defines a language over an alphabet.
pub trait Language: Alphabet {
    fn accepts(&self, input: &str) -> bool;
}

impl<T: Execute + GraphAutomaton> Language for T {
    fn accepts(&self, input: &str) -> bool {
        self.execute(input)
    }
}

/// Standard validation messages shared by the variants.
pub(crate) fn epsilon_issues(graph: &Graph, kind: AutomatonKind) -> Vec<String> {
    graph
        .transitions()
        .iter()
        .filter(|t| t.is_epsilon())
        .map(|t| {
            format!(
                "Transition {t} is an epsilon transition, which a {} cannot have",
                kind.label()
            )
        })
        .collect()
}

pub(crate) fn stack_issues(graph: &Graph, kind: AutomatonKind) -> Vec<String> {
    graph
        .transitions()
        .iter()
        .filter(|t| t.has_stack_effect())
        .map(|t| {
            format!(
                "Transition {t} has stack operations, which a {} does not use",
                kind.label()
            )
        })
        .collect()
}

impl AutomatonKind {
    pub fn label(&self) -> &'static str {
        match self {
            AutomatonKind::Dfa => "DFA",
            AutomatonKind::Nfa => "NFA",
            AutomatonKind::EpsilonNfa => "epsilon-NFA",
            AutomatonKind::Pda => "PDA",
        }
    }
}

/// Any automaton, tagged with its kind. This is the shape the serialization
/// layer reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Automaton {
    Dfa(Dfa),
    Nfa(Nfa),
    EpsilonNfa(EpsilonNfa),
    Pda(Pda),
}

/// A run of an [`Automaton`], shaped after the variant that started it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "state", rename_all = "snake_case")]
pub enum AnyExecution {
    Deterministic(ExecutionState<StateId>),
    Frontier(ExecutionState<BTreeSet<StateId>>),
    Stack(ExecutionState<PdaConfiguration>),
}

macro_rules! on_execution {
    ($execution:expr, $state:ident => $body:expr) => {
        match $execution {
            AnyExecution::Deterministic($state) => $body,
            AnyExecution::Frontier($state) => $body,
            AnyExecution::Stack($state) => $body,
        }
    };
}

impl AnyExecution {
    pub fn input(&self) -> String {
        on_execution!(self, s => s.input())
    }

    pub fn position(&self) -> usize {
        on_execution!(self, s => s.position())
    }

    pub fn is_accepted(&self) -> Option<bool> {
        on_execution!(self, s => s.is_accepted())
    }

    pub fn is_finished(&self) -> bool {
        on_execution!(self, s => s.is_finished())
    }

    pub fn halt(&self) -> Option<Halt> {
        on_execution!(self, s => s.halt())
    }

    pub fn history_len(&self) -> usize {
        on_execution!(self, s => s.history().len())
    }

    /// A short human readable rendering of the current configuration, e.g.
    /// `q1`, `{q0, q2}` or `q0 [XX#]` (stack top first).
    pub fn configuration_label(&self) -> String {
        match self {
            AnyExecution::Deterministic(s) => format!("q{}", s.current()),
            AnyExecution::Frontier(s) => format!(
                "{{{}}}",
                s.current().iter().map(|id| format!("q{id}")).join(", ")
            ),
            AnyExecution::Stack(s) => format!(
                "q{} [{}]",
                s.current().state,
                s.current()
                    .stack_top_first()
                    .map(display_symbol)
                    .collect::<String>()
            ),
        }
    }
}

macro_rules! on_automaton {
    ($automaton:expr, $inner:ident => $body:expr) => {
        match $automaton {
            Automaton::Dfa($inner) => $body,
            Automaton::Nfa($inner) => $body,
            Automaton::EpsilonNfa($inner) => $body,
            Automaton::Pda($inner) => $body,
        }
    };
}

impl Automaton {
    /// Assembles an automaton of the given kind from flat lists.
    pub fn from_parts(
        kind: AutomatonKind,
        states: impl IntoIterator<Item = State>,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Result<Self, GraphError> {
        Ok(match kind {
            AutomatonKind::Dfa => Automaton::Dfa(Dfa::from_parts(states, transitions)?),
            AutomatonKind::Nfa => Automaton::Nfa(Nfa::from_parts(states, transitions)?),
            AutomatonKind::EpsilonNfa => {
                Automaton::EpsilonNfa(EpsilonNfa::from_parts(states, transitions)?)
            }
            AutomatonKind::Pda => Automaton::Pda(Pda::from_parts(states, transitions)?),
        })
    }

    pub fn kind(&self) -> AutomatonKind {
        match self {
            Automaton::Dfa(_) => AutomatonKind::Dfa,
            Automaton::Nfa(_) => AutomatonKind::Nfa,
            Automaton::EpsilonNfa(_) => AutomatonKind::EpsilonNfa,
            Automaton::Pda(_) => AutomatonKind::Pda,
        }
    }

    pub fn graph(&self) -> &Graph {
        on_automaton!(self, a => a.graph())
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        on_automaton!(self, a => a.graph_mut())
    }

    pub fn validate(&self) -> Vec<String> {
        on_automaton!(self, a => a.validate())
    }

    pub fn execute(&self, input: &str) -> bool {
        on_automaton!(self, a => a.execute(input))
    }

    pub fn start_execution(&self, input: &str) -> AnyExecution {
        match self {
            Automaton::Dfa(a) => AnyExecution::Deterministic(a.start_execution(input)),
            Automaton::Nfa(a) => AnyExecution::Frontier(a.start_execution(input)),
            Automaton::EpsilonNfa(a) => AnyExecution::Frontier(a.start_execution(input)),
            Automaton::Pda(a) => AnyExecution::Stack(a.start_execution(input)),
        }
    }

    pub fn step_forward(&self, execution: &mut AnyExecution) {
        match (self, execution) {
            (Automaton::Dfa(a), AnyExecution::Deterministic(s)) => a.step_forward(s),
            (Automaton::Nfa(a), AnyExecution::Frontier(s)) => a.step_forward(s),
            (Automaton::EpsilonNfa(a), AnyExecution::Frontier(s)) => a.step_forward(s),
            (Automaton::Pda(a), AnyExecution::Stack(s)) => a.step_forward(s),
            (automaton, _) => panic!(
                "execution state does not belong to a {}",
                automaton.kind().label()
            ),
        }
    }

    pub fn step_backward(&self, execution: &mut AnyExecution) {
        on_execution!(execution, s => s.step_backward())
    }

    pub fn execute_all(&self, execution: &mut AnyExecution) {
        while !execution.is_finished() {
            self.step_forward(execution);
        }
    }
}

impl From<Dfa> for Automaton {
    fn from(value: Dfa) -> Self {
        Automaton::Dfa(value)
    }
}

impl From<Nfa> for Automaton {
    fn from(value: Nfa) -> Self {
        Automaton::Nfa(value)
    }
}

impl From<EpsilonNfa> for Automaton {
    fn from(value: EpsilonNfa) -> Self {
        Automaton::EpsilonNfa(value)
    }
}

impl From<Pda> for Automaton {
    fn from(value: Pda) -> Self {
        Automaton::Pda(value)
    }
}
