use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        AutomatonKind, Execute, GraphAutomaton,
        graph::{EPSILON, Graph, display_symbol},
    },
    config::PdaLimits,
    execution::{
        ExecutionState,
        stack::{self, PdaConfiguration},
    },
};

/// A deterministic pushdown automaton. Accepts by final state and empty
/// stack together.
///
/// The closure bounds live on the automaton and are not serialized. The
/// `*_with_limits` functions take explicit bounds instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pda {
    graph: Graph,
    #[serde(skip)]
    limits: PdaLimits,
}

impl Pda {
    pub fn new() -> Self {
        Pda::default()
    }

    pub fn with_limits(mut self, limits: PdaLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &PdaLimits {
        &self.limits
    }

    pub fn set_limits(&mut self, limits: PdaLimits) {
        self.limits = limits;
    }

    pub fn start_execution_with_limits(
        &self,
        input: &str,
        limits: &PdaLimits,
    ) -> ExecutionState<PdaConfiguration> {
        stack::start(&self.graph, input, limits)
    }

    pub fn step_forward_with_limits(
        &self,
        state: &mut ExecutionState<PdaConfiguration>,
        limits: &PdaLimits,
    ) {
        stack::step(&self.graph, state, limits);
    }

    pub fn execute_all_with_limits(
        &self,
        state: &mut ExecutionState<PdaConfiguration>,
        limits: &PdaLimits,
    ) {
        while !state.is_finished() {
            self.step_forward_with_limits(state, limits);
        }
    }

    pub fn execute_with_limits(&self, input: &str, limits: &PdaLimits) -> bool {
        let mut state = self.start_execution_with_limits(input, limits);
        self.execute_all_with_limits(&mut state, limits);
        state.is_accepted().unwrap_or(false)
    }
}

impl GraphAutomaton for Pda {
    const KIND: AutomatonKind = AutomatonKind::Pda;

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    fn from_graph(graph: Graph) -> Self {
        Pda {
            graph,
            limits: PdaLimits::default(),
        }
    }

    fn validate(&self) -> Vec<String> {
        let mut issues = self.graph.structural_issues();

        issues.extend(
            self.graph
                .transitions()
                .iter()
                .counts_by(|t| (t.from_state_id(), t.symbol(), t.stack_pop()))
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .sorted()
                .map(|((from, symbol, pop), count)| {
                    format!(
                        "State {from} has {count} transitions on symbol '{}' with pop '{}', a PDA allows at most one",
                        display_symbol(symbol),
                        display_symbol(pop.unwrap_or(EPSILON))
                    )
                }),
        );

        issues
    }
}

impl Execute for Pda {
    type Configuration = PdaConfiguration;

    fn start_execution(&self, input: &str) -> ExecutionState<PdaConfiguration> {
        self.start_execution_with_limits(input, &self.limits)
    }

    fn step_forward(&self, state: &mut ExecutionState<PdaConfiguration>) {
        self.step_forward_with_limits(state, &self.limits);
    }
}
