use std::collections::BTreeSet;

use itertools::{Itertools, repeat_n};

use crate::automaton::Language;

/// All words over the union of both alphabets, shortest first, up to and
/// including `max_word_length`. The empty word comes first.
fn words(a: &impl Language, b: &impl Language, max_word_length: usize) -> Vec<String> {
    let alphabet = a
        .alphabet()
        .into_iter()
        .chain(b.alphabet())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect_vec();

    let mut words = vec![String::new()];
    if alphabet.is_empty() {
        return words;
    }

    for length in 1..=max_word_length {
        words.extend(
            repeat_n(alphabet.iter(), length)
                .multi_cartesian_product()
                .map(|word| word.into_iter().collect::<String>()),
        );
    }

    words
}

/// Checks if two automata accept the same words up to a certain length.
/// Unlike a full equivalence check this only samples, but for small
/// automata a length a bit above the state count is conclusive in practice.
pub fn same_language(a: &impl Language, b: &impl Language, max_word_length: usize) -> bool {
    words(a, b, max_word_length)
        .iter()
        .all(|word| a.accepts(word) == b.accepts(word))
}

pub fn assert_same_language(a: &impl Language, b: &impl Language, max_word_length: usize) {
    for word in words(a, b, max_word_length) {
        match (a.accepts(&word), b.accepts(&word)) {
            (true, false) => {
                panic!(
                    "{:?} is accepted by automaton `a` but not by automaton `b`. Thus their languages are not equal.",
                    word
                );
            }
            (false, true) => {
                panic!(
                    "{:?} is accepted by automaton `b` but not by automaton `a`. Thus their languages are not equal.",
                    word
                );
            }
            _ => {}
        }
    }
}
