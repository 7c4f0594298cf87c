//! Termination log specs
//!
//! Verify cursor semantics over the append-only log.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn cursor_sees_only_entries_after_creation() {
    let scheduler = scheduler();
    for _ in 0..3 {
        let (h, _) = probe(ActionSpec::instant());
        scheduler.submit(&h).unwrap();
    }
    let mut cursor = scheduler.cursor();
    assert!(!cursor.has_new());

    let later: Vec<_> = (0..2).map(|_| probe(ActionSpec::instant()).0).collect();
    for h in &later {
        scheduler.submit(h).unwrap();
    }

    let ids: Vec<_> = cursor.poll().iter().map(|e| e.action_id).collect();
    assert_eq!(ids, later.iter().map(|h| h.id()).collect::<Vec<_>>());
    assert!(cursor.poll().is_empty());
    assert_eq!(scheduler.log().len(), 5);
}

#[test]
fn cursors_are_independent() {
    let scheduler = scheduler();
    let mut a = scheduler.cursor();
    let mut b = scheduler.cursor();
    let (h, _) = probe(ActionSpec::instant());
    scheduler.submit(&h).unwrap();

    assert_eq!(a.poll().to_vec().len(), 1);
    assert_eq!(b.poll().to_vec().len(), 1);
    assert!(a.poll().is_empty());
}

#[test]
fn entries_carry_sequence_and_elapsed_time() {
    let scheduler = scheduler();
    let (first, _) = probe(ActionSpec::timed(secs(2.0)));
    scheduler.submit(&first).unwrap();
    tick_by(&scheduler, secs(2.5));

    let (second, _) = probe(ActionSpec::instant());
    scheduler.submit(&second).unwrap();

    let entries = scheduler.log().entries();
    let summary: Vec<_> = entries
        .iter()
        .map(|e| (e.sequence, e.action_id, e.elapsed, e.reason))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, first.id(), secs(2.5), EndReason::Expired),
            (2, second.id(), secs(2.5), EndReason::Ended),
        ]
    );
}
