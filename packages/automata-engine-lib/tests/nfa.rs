use automata_engine_lib::{
    automaton::{
        Execute, GraphAutomaton, Language,
        graph::{State, Transition},
        nfa::Nfa,
    },
    execution::{Halt, frontier::Frontier},
    validation::same_language::assert_same_language,
};
use rand::{RngExt, SeedableRng, rngs::StdRng};

/// Words over {a, b} ending in `ab`.
fn ends_with_ab() -> Nfa {
    Nfa::from_parts(
        [
            State::non_accepting(0).into_start(),
            State::non_accepting(1),
            State::accepting(2),
        ],
        [
            Transition::new(0, 0, 'a'),
            Transition::new(0, 0, 'b'),
            Transition::new(0, 1, 'a'),
            Transition::new(1, 2, 'b'),
        ],
    )
    .unwrap()
}

fn random_nfa(seed: u64, state_count: i32, alphabet: &[char]) -> Nfa {
    let mut r = StdRng::seed_from_u64(seed);
    let mut nfa = Nfa::new();

    for id in 0..state_count {
        nfa.add_state(State::new(id, id == 0, r.random_range(0..3) == 0));
    }

    for from in 0..state_count {
        for &symbol in alphabet {
            for _ in 0..r.random_range(0..3) {
                let to = r.random_range(0..state_count);
                nfa.add_transition(Transition::new(from, to, symbol));
            }
        }
    }

    nfa
}

#[test]
fn test_nfa() {
    let nfa = ends_with_ab();

    assert!(nfa.accepts("ab"));
    assert!(nfa.accepts("bbab"));
    assert!(nfa.accepts("aaab"));
    assert!(!nfa.accepts(""));
    assert!(!nfa.accepts("aba"));
    assert!(!nfa.accepts("b"));
}

#[test]
fn test_nfa_frontier() {
    let nfa = ends_with_ab();
    let mut state = nfa.start_execution("ab");

    assert_eq!(state.current(), &Frontier::from([0]));

    nfa.step_forward(&mut state);
    assert_eq!(state.current(), &Frontier::from([0, 1]));

    nfa.step_forward(&mut state);
    assert_eq!(state.current(), &Frontier::from([0, 2]));
    assert_eq!(state.is_accepted(), Some(true));
}

#[test]
fn test_nfa_empty_frontier() {
    let nfa = Nfa::from_parts(
        [State::non_accepting(0).into_start(), State::accepting(1)],
        [Transition::new(0, 1, 'a')],
    )
    .unwrap();

    let mut state = nfa.start_execution("aab");
    nfa.execute_all(&mut state);

    assert_eq!(state.halt(), Some(Halt::EmptyFrontier));
    assert_eq!(state.is_accepted(), Some(false));
    assert_eq!(state.position(), 2);
    assert!(state.current().is_empty());
}

#[test]
fn test_nfa_to_dfa() {
    let nfa = ends_with_ab();
    let (dfa, frontiers) = nfa.to_dfa_with_mapping();

    assert!(dfa.validate().is_empty(), "{:?}", dfa.validate());
    assert_eq!(dfa.graph().start_state(), Some(0));
    assert_eq!(frontiers[&0], Frontier::from([0]));
    assert_eq!(dfa.graph().state_count(), 3);
    assert_eq!(frontiers.len(), 3);

    assert_same_language(&nfa, &dfa, 6);
}

#[test]
fn test_nfa_to_dfa_omits_the_empty_frontier() {
    let nfa = Nfa::from_parts(
        [State::non_accepting(0).into_start(), State::accepting(1)],
        [Transition::new(0, 1, 'a'), Transition::new(1, 1, 'b')],
    )
    .unwrap();

    let (dfa, frontiers) = nfa.to_dfa_with_mapping();
    assert_eq!(dfa.graph().state_count(), 2);
    assert!(frontiers.values().all(|f| !f.is_empty()));
    assert!(dfa.accepts("abbb"));
    assert!(!dfa.accepts("b"));
}

#[test]
fn test_nfa_to_dfa_random() {
    let alphabet = ['a', 'b'];

    for seed in 0..25 {
        let nfa = random_nfa(seed, 5, &alphabet);
        let dfa = nfa.to_dfa();

        assert!(dfa.validate().is_empty(), "seed {seed}: {:?}", dfa.validate());
        assert_same_language(&nfa, &dfa, 7);
    }
}
