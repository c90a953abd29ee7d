//! Property tests over arbitrary command sequences.

use proptest::prelude::*;

use studyflow_core::{Event, RewardLedger, SessionController};

#[derive(Debug, Clone)]
enum Cmd {
    Start(u64),
    Pause,
    Resume,
    Reset,
    Tick(u32),
}

fn cmd_strategy() -> impl Strategy<Value = Cmd> {
    prop_oneof![
        (1u64..=3).prop_map(Cmd::Start),
        Just(Cmd::Pause),
        Just(Cmd::Resume),
        Just(Cmd::Reset),
        (1u32..=200).prop_map(Cmd::Tick),
    ]
}

proptest! {
    /// remaining_seconds never exceeds total_seconds and registration
    /// happens exactly once per completion, for any command sequence.
    #[test]
    fn countdown_and_ledger_invariants(
        cmds in proptest::collection::vec(cmd_strategy(), 1..80)
    ) {
        let mut controller = SessionController::new();
        let mut ledger = RewardLedger::with_seed(99);
        let mut completions = 0u32;
        let mut milestones_seen = Vec::new();
        let mut previous_best = 0u32;
        let mut previous_achievement_count = 0usize;

        for cmd in cmds {
            match cmd {
                Cmd::Start(minutes) => {
                    controller.start(minutes, None);
                }
                Cmd::Pause => {
                    controller.pause();
                }
                Cmd::Resume => {
                    controller.resume();
                }
                Cmd::Reset => {
                    controller.reset();
                }
                Cmd::Tick(n) => {
                    for _ in 0..n {
                        if let Some(Event::SessionCompleted { reward, .. }) =
                            controller.tick(&mut ledger)
                        {
                            completions += 1;
                            if let Some(milestone) = reward.milestone {
                                milestones_seen.push(milestone);
                            }
                        }
                    }
                }
            }

            prop_assert!(
                controller.remaining_seconds() <= controller.total_seconds()
                    || controller.total_seconds() == 0
            );
            prop_assert!(ledger.best_streak() >= ledger.current_streak());
            prop_assert!(ledger.best_streak() >= previous_best);
            previous_best = ledger.best_streak();

            let achievements = ledger.achievements();
            prop_assert!(achievements.len() >= previous_achievement_count);
            previous_achievement_count = achievements.len();
        }

        // register_session ran exactly once per observed completion.
        prop_assert_eq!(ledger.session_count(), completions);

        // Each milestone was reported at most once, in ascending order.
        let mut sorted = milestones_seen.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(&milestones_seen, &sorted);
        prop_assert_eq!(milestones_seen, ledger.achievements());
    }

    /// break_streak interleaved with registrations keeps best_streak as a
    /// running maximum.
    #[test]
    fn streak_bookkeeping(ops in proptest::collection::vec(any::<bool>(), 1..200)) {
        let mut ledger = RewardLedger::with_seed(5);
        let mut expected_current = 0u32;
        let mut expected_best = 0u32;

        for register in ops {
            if register {
                ledger.register_session(5, 1.0);
                expected_current += 1;
                expected_best = expected_best.max(expected_current);
            } else {
                ledger.break_streak();
                expected_current = 0;
            }
            prop_assert_eq!(ledger.current_streak(), expected_current);
            prop_assert_eq!(ledger.best_streak(), expected_best);
        }
    }
}
