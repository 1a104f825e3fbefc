use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::automaton::{
    GraphAutomaton,
    algorithms::reachable_states,
    dfa::Dfa,
    graph::{Graph, State, StateId, Transition},
};

/// Represents the table used in the minimization of a DFA.
///
/// The table holds one entry per state reachable from the start state,
/// sorted by id. Each entry lists the successor of its state for every
/// symbol of the alphabet, in alphabet order, `None` where the DFA has no
/// transition. Refinement assigns every entry a block; entries in the same
/// block are indistinguishable and become one state.
#[derive(Debug, Clone)]
pub struct DfaMinimizationTable<'a> {
    dfa: &'a Dfa,
    alphabet: Vec<char>,
    table: Vec<DfaMinimizationTableEntry>,
    blocks: Vec<usize>,
}

impl<'a> DfaMinimizationTable<'a> {
    /// Builds the table for the reachable part of `dfa`. Panics if the DFA
    /// has no unique start state.
    pub fn new(dfa: &'a Dfa) -> Self {
        let graph = dfa.graph();
        let start = graph.expect_start_state();
        let reachable = reachable_states(graph.transitions(), start);

        let alphabet = graph
            .transitions()
            .iter()
            .filter(|t| !t.is_epsilon() && reachable.contains(&t.from_state_id()))
            .map(|t| t.symbol())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect_vec();

        let table = reachable
            .iter()
            .map(|&state| DfaMinimizationTableEntry {
                state,
                is_initial: state == start,
                is_final: graph.is_accepting(state),
                transitions: alphabet
                    .iter()
                    .map(|&symbol| dfa.successor(state, symbol))
                    .collect(),
            })
            .collect();

        DfaMinimizationTable {
            dfa,
            alphabet,
            table,
            blocks: vec![],
        }
    }

    pub fn entries(&self) -> &[DfaMinimizationTableEntry] {
        &self.table
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Partition refinement. Starts from the accepting / non-accepting split
    /// and splits blocks until every block agrees, for every symbol, on the
    /// block of its successor. A missing transition is its own outcome.
    ///
    /// Blocks are numbered in order of their smallest member. Returns the
    /// number of blocks.
    pub fn refine(&mut self) -> usize {
        let index_of: HashMap<StateId, usize> = self
            .table
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.state, i))
            .collect();

        let (mut blocks, mut count) = number_by_first_appearance(
            self.table.iter().map(|entry| entry.is_final),
        );

        loop {
            let signatures = self.table.iter().enumerate().map(|(i, entry)| {
                let targets = entry
                    .transitions
                    .iter()
                    .map(|target| target.map(|t| blocks[index_of[&t]]))
                    .collect_vec();
                (blocks[i], targets)
            });

            let (next, next_count) = number_by_first_appearance(signatures);

            blocks = next;
            if next_count == count {
                break;
            }
            count = next_count;
        }

        self.blocks = blocks;
        count
    }

    /// The block of every entry, in entry order. Empty until
    /// [`DfaMinimizationTable::refine`] ran.
    pub fn blocks(&self) -> &[usize] {
        &self.blocks
    }

    /// Builds the minimized DFA from a refined table.
    pub fn to_result(&self) -> MinimizationResult {
        assert_eq!(
            self.blocks.len(),
            self.table.len(),
            "the table must be refined before building the minimized DFA"
        );

        let block_of = |state: StateId| self.blocks[self.position(state)] as StateId;

        let mut state_mapping = BTreeMap::new();
        let mut merged_state_groups: BTreeMap<StateId, BTreeSet<StateId>> = BTreeMap::new();
        for (entry, &block) in self.table.iter().zip(&self.blocks) {
            state_mapping.insert(entry.state, block as StateId);
            merged_state_groups
                .entry(block as StateId)
                .or_default()
                .insert(entry.state);
        }

        let mut graph = Graph::new();
        for (&id, members) in &merged_state_groups {
            let (mut is_start, mut is_accepting) = (false, false);
            for &member in members {
                let entry = &self.table[self.position(member)];
                is_start |= entry.is_initial;
                is_accepting |= entry.is_final;
            }
            graph.add_state(State::new(id, is_start, is_accepting));
        }

        let transitions = self
            .table
            .iter()
            .flat_map(|entry| {
                self.alphabet
                    .iter()
                    .zip(&entry.transitions)
                    .filter_map(move |(&symbol, target)| {
                        target.map(|t| (block_of(entry.state), symbol, block_of(t)))
                    })
            })
            .collect::<BTreeSet<_>>();

        for (from, symbol, to) in transitions {
            graph.add_transition(Transition::new(from, to, symbol));
        }

        MinimizationResult {
            dfa: Dfa::from_graph(graph),
            state_mapping,
            merged_state_groups,
            original_state_count: self.dfa.state_count(),
            reachable_state_count: self.table.len(),
        }
    }

    fn position(&self, state: StateId) -> usize {
        self.table
            .binary_search_by_key(&state, |entry| entry.state)
            .unwrap_or_else(|_| panic!("state {state} is not part of the table"))
    }
}

/// Numbers values by the order in which they first appear. Returns the
/// numbering and the number of distinct values.
fn number_by_first_appearance<K: Eq + std::hash::Hash>(
    values: impl Iterator<Item = K>,
) -> (Vec<usize>, usize) {
    let mut ids = HashMap::new();
    let numbering = values
        .map(|value| {
            let next = ids.len();
            *ids.entry(value).or_insert(next)
        })
        .collect();
    (numbering, ids.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaMinimizationTableEntry {
    pub state: StateId,
    pub is_initial: bool,
    pub is_final: bool,
    pub transitions: Vec<Option<StateId>>,
}

/// A minimized DFA together with how the original states were merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimizationResult {
    pub dfa: Dfa,
    /// Original reachable state id to the id of the state it was merged into.
    pub state_mapping: BTreeMap<StateId, StateId>,
    /// New state id to the original states merged into it.
    pub merged_state_groups: BTreeMap<StateId, BTreeSet<StateId>>,
    pub original_state_count: usize,
    pub reachable_state_count: usize,
}

impl MinimizationResult {
    pub fn minimized_state_count(&self) -> usize {
        self.dfa.state_count()
    }

    /// True if no two reachable states were merged.
    pub fn is_already_minimal(&self) -> bool {
        self.minimized_state_count() == self.reachable_state_count
    }

    pub fn report(&self) -> String {
        let mut lines = self
            .merged_state_groups
            .iter()
            .map(|(id, group)| format!("q{id} = {{{}}}", group.iter().join(", ")))
            .collect_vec();

        lines.push(format!(
            "original states: {}, reachable: {}, minimized: {}",
            self.original_state_count,
            self.reachable_state_count,
            self.minimized_state_count()
        ));

        lines.join("\n")
    }
}

pub trait Minimizable {
    fn minimize(&self) -> Self;
}

impl Dfa {
    /// Removes unreachable states and merges indistinguishable ones.
    pub fn minimize_with_report(&self) -> MinimizationResult {
        let mut table = DfaMinimizationTable::new(self);
        table.refine();
        let result = table.to_result();

        tracing::debug!(
            "minimized DFA: {} states, {} reachable, {} after merging",
            result.original_state_count,
            result.reachable_state_count,
            result.minimized_state_count()
        );

        result
    }
}

impl Minimizable for Dfa {
    fn minimize(&self) -> Self {
        self.minimize_with_report().dfa
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_appearance_numbering() {
        let (numbering, count) = number_by_first_appearance(["b", "a", "b", "c"].into_iter());
        assert_eq!(numbering, vec![0, 1, 0, 2]);
        assert_eq!(count, 3);
    }

    #[test]
    fn table_lists_reachable_states_in_id_order() {
        let dfa = Dfa::from_parts(
            [
                State::non_accepting(2),
                State::accepting(1),
                State::non_accepting(0).into_start(),
                State::accepting(9),
            ],
            [
                Transition::new(0, 2, 'b'),
                Transition::new(2, 1, 'a'),
                Transition::new(9, 0, 'c'),
            ],
        )
        .unwrap();

        let table = DfaMinimizationTable::new(&dfa);
        assert_eq!(
            table.entries().iter().map(|e| e.state).collect_vec(),
            vec![0, 1, 2]
        );
        assert_eq!(table.alphabet(), &['a', 'b']);
        assert_eq!(table.entries()[0].transitions, vec![None, Some(2)]);
    }
}
