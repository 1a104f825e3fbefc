use std::collections::{BTreeMap, BTreeSet};

use automata_engine_lib::{
    automaton::{
        GraphAutomaton, Language,
        algorithms::{MinimizationAnalysis, analyze_minimization},
        dfa::{Dfa, minimization::Minimizable},
        graph::{State, Transition},
    },
    validation::same_language::{assert_same_language, same_language},
};
use rand::{RngExt, SeedableRng, rngs::StdRng};

/// Words over {a, b} ending in `a`, with two redundant states and one
/// unreachable state.
fn redundant() -> Dfa {
    Dfa::from_parts(
        [
            State::non_accepting(0).into_start(),
            State::accepting(1),
            State::accepting(2),
            State::non_accepting(3),
            State::accepting(4),
        ],
        [
            Transition::new(0, 1, 'a'),
            Transition::new(0, 3, 'b'),
            Transition::new(1, 2, 'a'),
            Transition::new(1, 3, 'b'),
            Transition::new(2, 1, 'a'),
            Transition::new(2, 0, 'b'),
            Transition::new(3, 2, 'a'),
            Transition::new(3, 0, 'b'),
            Transition::new(4, 0, 'a'),
        ],
    )
    .unwrap()
}

fn random_dfa(seed: u64, state_count: i32, alphabet: &[char]) -> Dfa {
    let mut r = StdRng::seed_from_u64(seed);
    let mut dfa = Dfa::new();

    for id in 0..state_count {
        dfa.add_state(State::new(id, id == 0, r.random_range(0..3) == 0));
    }

    for from in 0..state_count {
        for &symbol in alphabet {
            if r.random_range(0..4) != 0 {
                let to = r.random_range(0..state_count);
                dfa.add_transition(Transition::new(from, to, symbol));
            }
        }
    }

    dfa
}

#[test]
fn test_minimize() {
    let dfa = redundant();
    let result = dfa.minimize_with_report();

    assert_eq!(result.original_state_count, 5);
    assert_eq!(result.reachable_state_count, 4);
    assert_eq!(result.minimized_state_count(), 2);
    assert!(!result.is_already_minimal());

    assert_eq!(
        result.state_mapping,
        BTreeMap::from([(0, 0), (1, 1), (2, 1), (3, 0)])
    );
    assert_eq!(
        result.merged_state_groups,
        BTreeMap::from([(0, BTreeSet::from([0, 3])), (1, BTreeSet::from([1, 2]))])
    );

    let minimized = &result.dfa;
    assert!(minimized.validate().is_empty(), "{:?}", minimized.validate());
    assert_eq!(minimized.graph().start_state(), Some(0));
    assert!(minimized.graph().is_accepting(1));
    assert_eq!(minimized.graph().transition_count(), 4);

    assert_same_language(&dfa, minimized, 8);
}

#[test]
fn test_minimization_report() {
    let result = redundant().minimize_with_report();

    assert_eq!(
        result.report(),
        "q0 = {0, 3}\nq1 = {1, 2}\noriginal states: 5, reachable: 4, minimized: 2"
    );
}

#[test]
fn test_missing_transition_distinguishes_states() {
    let dfa = Dfa::from_parts(
        [
            State::non_accepting(0).into_start(),
            State::accepting(1),
            State::accepting(2),
        ],
        [
            Transition::new(0, 1, 'a'),
            Transition::new(0, 2, 'b'),
            Transition::new(1, 1, 'a'),
        ],
    )
    .unwrap();

    let result = dfa.minimize_with_report();
    assert!(result.is_already_minimal());
    assert_eq!(result.minimized_state_count(), 3);
    assert!(result.dfa.accepts("b"));
    assert!(!result.dfa.accepts("ba"));
    assert!(result.dfa.accepts("aaa"));
}

#[test]
fn test_minimization_analysis() {
    assert_eq!(
        analyze_minimization(&redundant()),
        MinimizationAnalysis {
            original: 5,
            reachable: 4,
            minimized: 2
        }
    );

    let analysis = analyze_minimization(&redundant());
    assert_eq!(analysis.unreachable(), 1);
    assert_eq!(analysis.merged(), 2);
}

#[test]
fn test_minimize_random() {
    let alphabet = ['a', 'b', 'c'];

    for seed in 0..40 {
        let dfa = random_dfa(seed, 7, &alphabet);
        let minimized = dfa.minimize();

        assert!(
            minimized.graph().state_count() <= dfa.graph().state_count(),
            "seed {seed}"
        );
        assert!(
            minimized.validate().is_empty(),
            "seed {seed}: {:?}",
            minimized.validate()
        );
        assert!(same_language(&dfa, &minimized, 6), "seed {seed}");

        let twice = minimized.minimize();
        assert_eq!(
            twice.graph().state_count(),
            minimized.graph().state_count(),
            "seed {seed}"
        );

        let analysis = analyze_minimization(&dfa);
        assert_eq!(analysis.minimized, minimized.graph().state_count());
        assert!(analysis.reachable <= analysis.original);
    }
}

#[test]
fn test_minimized_nfa_conversion() {
    use automata_engine_lib::automaton::nfa::Nfa;

    // (a|b)*a(a|b) has a 4 state minimal DFA
    let nfa = Nfa::from_parts(
        [
            State::non_accepting(0).into_start(),
            State::non_accepting(1),
            State::accepting(2),
        ],
        [
            Transition::new(0, 0, 'a'),
            Transition::new(0, 0, 'b'),
            Transition::new(0, 1, 'a'),
            Transition::new(1, 2, 'a'),
            Transition::new(1, 2, 'b'),
        ],
    )
    .unwrap();

    let minimized = nfa.to_dfa().minimize();
    assert_eq!(minimized.graph().state_count(), 4);
    assert_same_language(&nfa, &minimized, 7);
}
