use automata_engine_lib::automaton::{
    Alphabet, GraphAutomaton,
    dfa::Dfa,
    graph::{Graph, GraphError, State, Transition},
    nfa::Nfa,
};

#[test]
fn test_add_state_rejects_duplicates() {
    let mut graph = Graph::new();
    graph.add_state(State::non_accepting(0).into_start());

    assert_eq!(
        graph.try_add_state(State::accepting(0)),
        Err(GraphError::DuplicateState(0))
    );
    assert_eq!(graph.state_count(), 1);
}

#[test]
fn test_second_start_state_is_rejected() {
    let mut graph = Graph::new();
    graph.add_state(State::non_accepting(0).into_start());

    assert_eq!(
        graph.try_add_state(State::accepting(1).into_start()),
        Err(GraphError::SecondStartState {
            existing: 0,
            new: 1
        })
    );
}

#[test]
#[should_panic(expected = "already exists")]
fn test_add_state_panics_on_duplicate() {
    let mut graph = Graph::new();
    graph.add_state(State::non_accepting(3));
    graph.add_state(State::non_accepting(3));
}

#[test]
fn test_set_start_state_moves_the_flag() {
    let mut graph = Graph::new();
    graph.add_state(State::non_accepting(0).into_start());
    graph.add_state(State::non_accepting(1));

    graph.set_start_state(1);
    assert_eq!(graph.start_state(), Some(1));
    assert!(!graph.state(0).unwrap().is_start);
    assert_eq!(graph.validate_start_state(), Ok(1));

    assert_eq!(graph.try_set_start_state(5), Err(GraphError::UnknownState(5)));
    assert_eq!(graph.start_state(), Some(1));
}

#[test]
fn test_transition_endpoints_must_exist() {
    let mut graph = Graph::new();
    graph.add_state(State::non_accepting(0).into_start());

    assert_eq!(
        graph.try_add_transition(Transition::new(0, 4, 'a')),
        Err(GraphError::UnknownEndpoint {
            from: 0,
            to: 4,
            missing: 4
        })
    );
    assert_eq!(graph.transition_count(), 0);
}

#[test]
fn test_validate_start_state() {
    let mut graph = Graph::new();
    assert_eq!(graph.validate_start_state(), Err(GraphError::NoStartState));

    graph.add_state(State::non_accepting(0));
    assert_eq!(graph.validate_start_state(), Err(GraphError::NoStartState));

    graph.set_start_state(0);
    assert_eq!(graph.validate_start_state(), Ok(0));
}

#[test]
#[should_panic(expected = "no start state")]
fn test_execution_without_start_state_panics() {
    use automata_engine_lib::automaton::Execute;

    let dfa = Dfa::from_parts([State::accepting(0)], []).unwrap();
    dfa.execute("");
}

#[test]
fn test_find_and_remove() {
    let mut nfa = Nfa::from_parts(
        [
            State::non_accepting(0).into_start(),
            State::non_accepting(1),
            State::accepting(2),
        ],
        [
            Transition::new(0, 1, 'a'),
            Transition::new(0, 2, 'a'),
            Transition::new(1, 2, 'b'),
        ],
    )
    .unwrap();

    assert_eq!(nfa.graph().find_transitions_from_state(0).count(), 2);
    assert_eq!(nfa.graph().find_transitions_for_symbol('b').count(), 1);
    assert_eq!(nfa.alphabet(), vec!['a', 'b']);

    assert!(nfa.remove_transition(&Transition::new(0, 2, 'a')));
    assert!(!nfa.remove_transition(&Transition::new(0, 2, 'a')));
    assert_eq!(nfa.graph().find_transitions_from_state(0).count(), 1);

    let removed = nfa.graph_mut().remove_state(1);
    assert_eq!(removed, Some(State::non_accepting(1)));
    assert_eq!(nfa.graph().transition_count(), 0);
    assert_eq!(nfa.alphabet(), Vec::<char>::new());
}

#[test]
fn test_from_parts_reports_the_first_error() {
    let result = Dfa::from_parts(
        [State::non_accepting(0).into_start()],
        [Transition::new(1, 0, 'a')],
    );

    assert_eq!(
        result.unwrap_err(),
        GraphError::UnknownEndpoint {
            from: 1,
            to: 0,
            missing: 1
        }
    );
}
