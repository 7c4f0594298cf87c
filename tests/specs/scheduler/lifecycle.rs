//! Lifecycle specs
//!
//! Verify submission errors and the end/terminate paths.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn submitting_a_registered_action_fails() {
    let scheduler = scheduler();
    let (handle, _) = probe(ActionSpec::ethernal());
    scheduler.submit(&handle).unwrap();

    let err = scheduler.submit(&handle).unwrap_err();
    assert!(matches!(err, SchedulerError::AlreadyRegistered(id) if id == handle.id()));
    assert_eq!(scheduler.active_count(), 1);
}

#[test]
fn submitting_an_archived_action_fails() {
    let scheduler = scheduler();
    let (handle, hooks) = probe(ActionSpec::timed(secs(1.0)));
    scheduler.submit(&handle).unwrap();
    tick_by(&scheduler, secs(1.0));
    assert!(handle.is_archived());

    let err = scheduler.submit(&handle).unwrap_err();
    assert!(matches!(err, SchedulerError::AlreadyArchived(_)));
    assert_eq!(hooks.count(&Hook::Start), 1);
}

#[test]
fn instant_action_is_archived_by_submit() {
    let scheduler = scheduler();
    let (handle, hooks) = probe(ActionSpec::instant());
    assert!(scheduler.submit(&handle).unwrap());

    assert_eq!(hooks.all(), vec![Hook::Start, Hook::End]);
    assert!(handle.is_archived());
    assert_eq!(scheduler.active_count(), 0);
    assert_eq!(scheduler.log().len(), 1);
}

#[test]
fn termination_sequence_runs_once() {
    let scheduler = scheduler();
    let (handle, hooks) = probe(ActionSpec::timed(secs(10.0)));
    scheduler.submit(&handle).unwrap();

    assert!(scheduler.terminate(&handle).unwrap());
    assert!(!scheduler.end(&handle).unwrap());
    assert!(!scheduler.trigger(&handle, TriggerCode::TerminateNow).unwrap());

    assert_eq!(hooks.all(), vec![Hook::Start, Hook::Terminate]);
    assert_eq!(scheduler.log().len(), 1);
    assert_eq!(scheduler.log().get(0).unwrap().reason, EndReason::Terminated);
}

#[test]
fn duplicate_group_names_are_rejected() {
    let scheduler = scheduler();
    scheduler.create_group("stun").unwrap();
    assert!(matches!(
        scheduler.create_group("stun"),
        Err(SchedulerError::Group(_))
    ));
}
