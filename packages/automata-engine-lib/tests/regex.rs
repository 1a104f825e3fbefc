use automata_engine_lib::{
    automaton::{GraphAutomaton, Language, epsilon_nfa::EpsilonNfa},
    regex::{RegexError, build_epsilon_nfa_from_regex},
    validation::same_language::assert_same_language,
};

fn assert_matches(pattern: &str, accepted: &[&str], rejected: &[&str]) {
    let nfa = build_epsilon_nfa_from_regex(pattern).unwrap();

    for word in accepted {
        assert!(nfa.accepts(word), "{pattern:?} should accept {word:?}");
    }

    for word in rejected {
        assert!(!nfa.accepts(word), "{pattern:?} should reject {word:?}");
    }
}

#[test]
fn test_regex_star() {
    assert_matches("a*", &["", "a", "aaa"], &["b", "ab"]);
}

#[test]
fn test_regex_alternation() {
    assert_matches("a|b", &["a", "b"], &["", "ab", "c"]);
}

#[test]
fn test_regex_binary_suffix() {
    assert_matches("(0|1)*01", &["01", "001", "10101"], &["", "10", "010"]);
}

#[test]
fn test_regex_plus_and_question() {
    assert_matches("ab+c?", &["ab", "abbb", "abc", "abbc"], &["a", "ac", "abcc"]);
    assert_matches("(ab)?c", &["c", "abc"], &["ab", "ababc"]);
}

#[test]
fn test_regex_character_classes() {
    assert_matches(
        "[a-c]+[0-9]",
        &["a1", "cab9", "bbb0"],
        &["d1", "a", "1", "a12"],
    );
    assert_matches(r"[\-+]?[0-9]+", &["-1", "+42", "7"], &["--1", "+"]);
}

#[test]
fn test_regex_escapes_and_anchors() {
    assert_matches(r"a\*b", &["a*b"], &["ab", "aab"]);
    assert_matches(r"\(a\)", &["(a)"], &["a"]);
    assert_matches("^ab$", &["ab"], &["", "a", "abab"]);
    assert_matches(r"a\$", &["a$"], &["a"]);
}

#[test]
fn test_regex_precedence() {
    // alternation binds weaker than concatenation
    assert_matches("ab|cd", &["ab", "cd"], &["abd", "acd", "b"]);
    // star binds tighter than concatenation
    assert_matches("ab*", &["a", "abb"], &["abab", ""]);
}

#[test]
fn test_regex_equivalent_patterns() {
    let a = EpsilonNfa::from_regex("(a|b)*").unwrap();
    let b = EpsilonNfa::from_regex("(a*b*)*").unwrap();
    assert_same_language(&a, &b, 6);

    let a = EpsilonNfa::from_regex("aa*").unwrap();
    let b = EpsilonNfa::from_regex("a+").unwrap();
    assert_same_language(&a, &b, 6);
}

#[test]
fn test_regex_result_is_well_formed() {
    let nfa = build_epsilon_nfa_from_regex("(x|y)*z[0-2]?").unwrap();
    assert!(nfa.validate().is_empty(), "{:?}", nfa.validate());
    assert_eq!(nfa.graph().accepting_states().count(), 1);

    let dfa = nfa.to_dfa();
    assert_same_language(&nfa, &dfa, 5);
}

#[test]
fn test_regex_errors() {
    assert_eq!(
        build_epsilon_nfa_from_regex(""),
        Err(RegexError::EmptyPattern)
    );
    assert_eq!(
        build_epsilon_nfa_from_regex("(ab"),
        Err(RegexError::MismatchedParenthesis { position: 0 })
    );
    assert_eq!(
        build_epsilon_nfa_from_regex("ab)"),
        Err(RegexError::MismatchedParenthesis { position: 2 })
    );
    assert_eq!(
        build_epsilon_nfa_from_regex("[9-0]"),
        Err(RegexError::InvalidRange {
            start: '9',
            end: '0'
        })
    );
    assert_eq!(
        build_epsilon_nfa_from_regex("a[]"),
        Err(RegexError::EmptyCharacterClass { position: 1 })
    );
    assert_eq!(
        build_epsilon_nfa_from_regex("[^a]"),
        Err(RegexError::NegatedCharacterClass { position: 0 })
    );
    assert_eq!(
        build_epsilon_nfa_from_regex("|a"),
        Err(RegexError::MissingOperand { operator: '|' })
    );
    assert_eq!(
        build_epsilon_nfa_from_regex("a\\"),
        Err(RegexError::TrailingEscape)
    );
}

#[test]
fn test_regex_error_messages() {
    let error = build_epsilon_nfa_from_regex("(a").unwrap_err();
    assert_eq!(error.to_string(), "mismatched parenthesis at position 0");
}
