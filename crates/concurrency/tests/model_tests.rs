//! Model-based property tests for the worker epoch tracker
//!
//! Random valid protocol sequences are applied to a tracker and to a plain
//! `BTreeSet`/`Vec` model, and every observable result is compared.

use proptest::prelude::*;
use std::collections::BTreeSet;
use strata_epoch_concurrency::WorkerEpochTracker;
use strata_epoch_core::{Timestamp, TxnId, TxnRef, WorkerId};

#[derive(Debug, Clone, Copy)]
enum Op {
    Begin,
    /// Finish the n-th (mod len) active transaction
    Commit(usize),
    Abort(usize),
    Oldest,
    Drain,
    /// Finish a transaction that was never begun
    Bogus(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Begin),
        2 => any::<usize>().prop_map(Op::Commit),
        2 => any::<usize>().prop_map(Op::Abort),
        2 => Just(Op::Oldest),
        1 => Just(Op::Drain),
        1 => any::<u64>().prop_map(Op::Bogus),
    ]
}

/// Hand out unique timestamps in a shuffled order so the minimum moves around
fn next_ts(counter: &mut u64) -> Timestamp {
    *counter += 1;
    let c = *counter;
    // Interleave low and high values; still unique
    Timestamp::new(if c % 2 == 0 { c * 1_000 } else { c })
}

fn handle(ts: Timestamp) -> TxnRef {
    TxnRef::new(TxnId::new(ts.as_u64()), ts)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn tracker_matches_model(
        gc_enabled in any::<bool>(),
        ops in prop::collection::vec(op_strategy(), 1..200),
    ) {
        let tracker: WorkerEpochTracker = WorkerEpochTracker::new(WorkerId::new(0), gc_enabled);
        let mut active: BTreeSet<Timestamp> = BTreeSet::new();
        let mut completed: Vec<Timestamp> = Vec::new();
        let mut counter = 0u64;
        let mut begins = 0usize;
        let mut finishes = 0usize;

        for op in ops {
            match op {
                Op::Begin => {
                    let ts = next_ts(&mut counter);
                    tracker.begin(ts);
                    active.insert(ts);
                    begins += 1;
                }
                Op::Commit(n) | Op::Abort(n) if !active.is_empty() => {
                    let ts = *active.iter().nth(n % active.len()).unwrap();
                    if matches!(op, Op::Commit(_)) {
                        tracker.commit(handle(ts));
                    } else {
                        tracker.abort(handle(ts));
                    }
                    active.remove(&ts);
                    if gc_enabled {
                        completed.push(ts);
                    }
                    finishes += 1;
                }
                Op::Commit(_) | Op::Abort(_) => {}
                Op::Oldest => {
                    prop_assert_eq!(tracker.oldest_active_timestamp(), active.first().copied());
                }
                Op::Drain => {
                    let mut got = tracker.drain_completed().start_timestamps();
                    got.sort();
                    completed.sort();
                    prop_assert_eq!(got, std::mem::take(&mut completed));
                    prop_assert_eq!(tracker.pending_completed(), 0);
                }
                Op::Bogus(raw) => {
                    let ts = Timestamp::new(raw);
                    if !active.contains(&ts) {
                        let err = tracker.try_commit(handle(ts)).unwrap_err();
                        prop_assert!(err.is_protocol_violation());
                    }
                }
            }

            prop_assert_eq!(tracker.active_count(), begins - finishes);
            prop_assert_eq!(tracker.active_count(), active.len());
        }

        prop_assert_eq!(tracker.oldest_active_timestamp(), active.first().copied());
        let mut rest = tracker.drain_completed().start_timestamps();
        rest.sort();
        completed.sort();
        prop_assert_eq!(rest, completed);
    }
}
