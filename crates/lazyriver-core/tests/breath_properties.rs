//! Property tests for the breath timer state machine.
//!
//! For every valid configuration a run lasts exactly `rounds * (in + out)`
//! ticks, shows `In` for `in` seconds then `Out` for `out` seconds each round,
//! and fires its completion callback once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;

use lazyriver_core::timer::{BreathConfig, BreathTimer, Phase, PhaseState};

fn arb_config() -> impl Strategy<Value = BreathConfig> {
    (1u32..=8, 1u32..=12, 1u32..=6)
        .prop_map(|(inhale, exhale, rounds)| BreathConfig::new(inhale, exhale, rounds).unwrap())
}

/// Run to completion, returning the state shown during each second and the
/// number of ticks it took.
fn run(config: BreathConfig, fired: Arc<AtomicUsize>) -> (Vec<PhaseState>, u64, BreathTimer) {
    let mut timer = BreathTimer::new(config).unwrap().on_complete(move || {
        fired.fetch_add(1, Ordering::SeqCst);
    });
    timer.start();

    let mut shown = Vec::new();
    let mut ticks = 0;
    while !timer.is_done() {
        shown.push(timer.state());
        assert!(timer.tick().is_some());
        ticks += 1;
        assert!(ticks <= config.duration_secs(), "run did not terminate");
    }
    (shown, ticks, timer)
}

proptest! {
    #[test]
    fn run_length_is_rounds_times_ratio(config in arb_config()) {
        let fired = Arc::new(AtomicUsize::new(0));
        let (_, ticks, mut timer) = run(config, Arc::clone(&fired));

        prop_assert_eq!(ticks, config.rounds as u64 * (config.inhale_secs + config.exhale_secs) as u64);
        prop_assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Completion is terminal.
        prop_assert!(timer.tick().is_none());
        prop_assert_eq!(fired.load(Ordering::SeqCst), 1);
        prop_assert_eq!(timer.phase(), Phase::Done);
    }

    #[test]
    fn phases_follow_in_out_rounds(config in arb_config()) {
        let (shown, _, _) = run(config, Arc::new(AtomicUsize::new(0)));

        let mut expected = Vec::new();
        for round in 1..=config.rounds {
            for count in 1..=config.inhale_secs {
                expected.push(PhaseState { phase: Phase::In, count, round });
            }
            for count in 1..=config.exhale_secs {
                expected.push(PhaseState { phase: Phase::Out, count, round });
            }
        }
        prop_assert_eq!(shown, expected);
    }

    #[test]
    fn counts_and_rounds_stay_within_limits(config in arb_config()) {
        let (shown, _, timer) = run(config, Arc::new(AtomicUsize::new(0)));
        for state in shown.iter().chain(std::iter::once(&timer.state())) {
            prop_assert!(state.count >= 1);
            prop_assert!(state.round >= 1 && state.round <= config.rounds);
            if state.phase != Phase::Done {
                prop_assert!(state.count <= config.limit(state.phase));
            }
        }
    }
}

#[test]
fn zero_length_configurations_fail_fast() {
    assert!(BreathConfig::new(0, 1, 1).is_err());
    assert!(BreathConfig::new(1, 0, 1).is_err());
    assert!(BreathConfig::new(1, 1, 0).is_err());

    let invalid = BreathConfig {
        inhale_secs: 1,
        exhale_secs: 1,
        rounds: 0,
    };
    assert!(BreathTimer::new(invalid).is_err());
}
