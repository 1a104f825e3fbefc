use crate::automaton::Execute;

pub mod same_language;

/// Steps through `input` one symbol at a time and checks that every step
/// backward restores the run exactly as it was before the matching step
/// forward. Finally rewinds to the start and compares against a fresh run.
pub fn assert_reversible_stepping<A: Execute>(automaton: &A, input: &str) {
    let fresh = automaton.start_execution(input);
    let mut state = fresh.clone();
    let mut snapshots = vec![];

    while !state.is_finished() {
        snapshots.push(state.clone());
        automaton.step_forward(&mut state);
        assert_eq!(
            state.history().len(),
            state.position(),
            "history and position diverged on {input:?}"
        );
    }

    while let Some(before) = snapshots.pop() {
        automaton.step_backward(&mut state);
        assert_eq!(
            state.position(),
            before.position(),
            "step backward did not restore the position on {input:?}"
        );
        assert_eq!(
            state.current(),
            before.current(),
            "step backward did not restore the configuration on {input:?}"
        );
        assert_eq!(state.history(), before.history());
        assert_eq!(state.is_accepted(), None);
    }

    assert_eq!(state.position(), fresh.position());
    assert_eq!(state.current(), fresh.current());
}
