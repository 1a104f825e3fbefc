//! Compiles a small regular expression syntax into an epsilon-NFA.
//!
//! Supported are literals, `\` escapes, character classes with ranges
//! (`[a-z0-9_]`), grouping, alternation `|` and the postfix operators `*`,
//! `+` and `?`. Patterns always match the whole input, so `^` at the very
//! start and `$` at the very end are accepted and ignored.
//!
//! Compilation runs in three passes: [`token::tokenize`] (which also inserts
//! explicit concatenation), [`postfix::to_postfix`] (shunting-yard) and
//! [`thompson::build`].

use thiserror::Error;

use crate::automaton::{GraphAutomaton, epsilon_nfa::EpsilonNfa};

pub mod postfix;
pub mod thompson;
pub mod token;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    #[error("the pattern is empty")]
    EmptyPattern,
    #[error("mismatched parenthesis at position {position}")]
    MismatchedParenthesis { position: usize },
    #[error("invalid range {start}-{end}, the start is greater than the end")]
    InvalidRange { start: char, end: char },
    #[error("empty character class at position {position}")]
    EmptyCharacterClass { position: usize },
    #[error("negated character class at position {position} is not supported")]
    NegatedCharacterClass { position: usize },
    #[error("character class at position {position} is never closed")]
    UnterminatedCharacterClass { position: usize },
    #[error("the pattern ends with an unfinished escape")]
    TrailingEscape,
    #[error("operator '{operator}' is missing an operand")]
    MissingOperand { operator: char },
}

/// Compiles `pattern` into an epsilon-NFA accepting exactly the strings the
/// pattern matches in full.
pub fn build_epsilon_nfa_from_regex(pattern: &str) -> Result<EpsilonNfa, RegexError> {
    let tokens = token::tokenize(pattern)?;
    let postfix = postfix::to_postfix(&tokens)?;
    let nfa = thompson::build(&postfix)?;

    tracing::debug!(
        "compiled regex {:?} into an epsilon-NFA with {} states",
        pattern,
        nfa.graph().state_count()
    );

    Ok(nfa)
}
