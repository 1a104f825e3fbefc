use serde::{Deserialize, Serialize};

pub mod deterministic;
pub mod frontier;
pub mod stack;

/// Which safety bound stopped a pushdown closure pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LimitKind {
    EpsilonIterations,
    StackGrowth,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Halt {
    /// The whole input was consumed and acceptance was decided.
    EndOfInput,
    /// No transition matched the next symbol. The position did not advance.
    NoTransition,
    /// The frontier of a nondeterministic run became empty.
    EmptyFrontier,
    /// A pushdown closure pass hit one of its safety bounds.
    LimitExceeded(LimitKind),
}

impl Halt {
    /// Whether the step that produced this halt consumed a symbol.
    pub fn advanced(&self) -> bool {
        !matches!(self, Halt::NoTransition)
    }
}

/// The state of a (possibly unfinished) run of an automaton on one input.
///
/// `C` is the configuration the automaton is in: a single state id, a
/// frontier of state ids, or a state plus stack. `history` holds the
/// configuration before every step that consumed a symbol, so
/// `history.len() == position` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawExecutionState<C>")]
pub struct ExecutionState<C> {
    #[serde(with = "input_string")]
    input: Vec<char>,
    position: usize,
    is_accepted: Option<bool>,
    halt: Option<Halt>,
    current: C,
    history: Vec<C>,
}

impl<C: Clone> ExecutionState<C> {
    pub(crate) fn new(input: &str, current: C) -> Self {
        ExecutionState {
            input: input.chars().collect(),
            position: 0,
            is_accepted: None,
            halt: None,
            current,
            history: vec![],
        }
    }

    pub fn input(&self) -> String {
        self.input.iter().collect()
    }

    pub fn symbols(&self) -> &[char] {
        &self.input
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// `None` while the run is undecided.
    pub fn is_accepted(&self) -> Option<bool> {
        self.is_accepted
    }

    pub fn is_finished(&self) -> bool {
        self.halt.is_some()
    }

    pub fn halt(&self) -> Option<Halt> {
        self.halt
    }

    pub fn current(&self) -> &C {
        &self.current
    }

    pub fn history(&self) -> &[C] {
        &self.history
    }

    /// The symbol the next step would consume.
    pub fn current_symbol(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn remaining(&self) -> &[char] {
        &self.input[self.position.min(self.input.len())..]
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Undoes the most recent step. Backing out of a failed step only clears
    /// the verdict, otherwise the previous configuration is restored. At
    /// position 0 this does nothing. Acceptance is always undecided after a
    /// successful step back.
    pub fn step_backward(&mut self) {
        if let Some(halt) = self.halt
            && !halt.advanced()
        {
            self.halt = None;
            self.is_accepted = None;
            return;
        }

        let Some(previous) = self.history.pop() else {
            return;
        };

        self.current = previous;
        self.position -= 1;
        self.halt = None;
        self.is_accepted = None;
    }

    /// Steps backward until the run is at `position`.
    pub fn rewind_to(&mut self, position: usize) {
        if self.halt.is_some_and(|h| !h.advanced()) && self.position >= position {
            self.step_backward();
        }

        while self.position > position && !self.history.is_empty() {
            self.step_backward();
        }
    }

    pub(crate) fn current_mut(&mut self) -> &mut C {
        &mut self.current
    }

    /// Consumes the current symbol and moves to `next`.
    pub(crate) fn advance(&mut self, next: C) {
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
        self.position += 1;
    }

    pub(crate) fn finish(&mut self, halt: Halt, accepted: bool) {
        self.halt = Some(halt);
        self.is_accepted = Some(accepted);
    }
}

/// The wire form of an [`ExecutionState`], checked before it is accepted.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExecutionState<C> {
    #[serde(with = "input_string")]
    input: Vec<char>,
    position: usize,
    is_accepted: Option<bool>,
    halt: Option<Halt>,
    current: C,
    history: Vec<C>,
}

impl<C> TryFrom<RawExecutionState<C>> for ExecutionState<C> {
    type Error = String;

    fn try_from(raw: RawExecutionState<C>) -> Result<Self, Self::Error> {
        if raw.position > raw.input.len() {
            return Err(format!(
                "position {} is past the end of an input of length {}",
                raw.position,
                raw.input.len()
            ));
        }

        if raw.history.len() != raw.position {
            return Err(format!(
                "history has {} entries but the position is {}",
                raw.history.len(),
                raw.position
            ));
        }

        Ok(ExecutionState {
            input: raw.input,
            position: raw.position,
            is_accepted: raw.is_accepted,
            halt: raw.halt,
            current: raw.current,
            history: raw.history,
        })
    }
}

mod input_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(input: &[char], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&input.iter().collect::<String>())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<char>, D::Error> {
        Ok(String::deserialize(deserializer)?.chars().collect())
    }
}
