use automata_engine_lib::{
    automaton::{
        Execute, GraphAutomaton, Language,
        dfa::Dfa,
        graph::{State, Transition},
    },
    execution::Halt,
};

/// Words over {a, b} with an even number of `a`s.
fn even_as() -> Dfa {
    Dfa::from_parts(
        [State::accepting(0).into_start(), State::non_accepting(1)],
        [
            Transition::new(0, 1, 'a'),
            Transition::new(0, 0, 'b'),
            Transition::new(1, 0, 'a'),
            Transition::new(1, 1, 'b'),
        ],
    )
    .unwrap()
}

#[test]
fn test_dfa() {
    let dfa = even_as();

    assert!(dfa.accepts(""));
    assert!(dfa.accepts("aa"));
    assert!(dfa.accepts("babab"));
    assert!(!dfa.accepts("a"));
    assert!(!dfa.accepts("ababa"));
    assert!(!dfa.accepts("abc"));
}

#[test]
fn test_dfa_empty_input_decides_immediately() {
    let dfa = even_as();
    let state = dfa.start_execution("");

    assert!(state.is_finished());
    assert_eq!(state.is_accepted(), Some(true));
    assert_eq!(state.halt(), Some(Halt::EndOfInput));
    assert_eq!(state.position(), 0);
}

#[test]
fn test_dfa_stepping() {
    let dfa = even_as();
    let mut state = dfa.start_execution("ab");

    assert_eq!(*state.current(), 0);
    assert_eq!(state.is_accepted(), None);

    dfa.step_forward(&mut state);
    assert_eq!(*state.current(), 1);
    assert_eq!(state.position(), 1);
    assert_eq!(state.is_accepted(), None);

    dfa.step_forward(&mut state);
    assert_eq!(*state.current(), 1);
    assert_eq!(state.position(), 2);
    assert_eq!(state.is_accepted(), Some(false));
    assert_eq!(state.history(), &[0, 1]);

    // finished runs ignore further steps
    dfa.step_forward(&mut state);
    assert_eq!(state.position(), 2);

    dfa.step_backward(&mut state);
    assert_eq!(*state.current(), 1);
    assert_eq!(state.position(), 1);
    assert_eq!(state.is_accepted(), None);
    assert!(!state.is_finished());
}

#[test]
fn test_dfa_missing_transition_rejects_in_place() {
    let dfa = even_as();
    let mut state = dfa.start_execution("bxa");

    dfa.execute_all(&mut state);
    assert_eq!(state.halt(), Some(Halt::NoTransition));
    assert_eq!(state.is_accepted(), Some(false));
    assert_eq!(state.position(), 1);
    assert_eq!(state.remaining(), &['x', 'a']);
}

#[test]
fn test_dfa_validation() {
    let mut dfa = even_as();
    assert!(dfa.validate().is_empty());

    dfa.add_transition(Transition::new(0, 0, 'a'));
    dfa.add_transition(Transition::epsilon(1, 0));

    let issues = dfa.validate();
    assert_eq!(issues.len(), 2, "{issues:?}");
    assert!(issues.iter().any(|i| i.contains("epsilon")));
    assert!(
        issues
            .iter()
            .any(|i| i.contains("State 0 has 2 transitions on symbol 'a'"))
    );
}

#[test]
fn test_dfa_validation_rejects_stack_operations() {
    let mut dfa = even_as();
    dfa.add_state(State::non_accepting(2));
    dfa.add_transition(Transition::pda(1, 2, 'c', Some('X'), None));

    let issues = dfa.validate();
    assert_eq!(issues.len(), 1, "{issues:?}");
    assert!(issues[0].contains("stack"));
}
