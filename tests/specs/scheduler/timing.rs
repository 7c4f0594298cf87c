//! Timing specs
//!
//! Verify that updates consume exactly the total duration.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn five_second_action_over_three_two_second_ticks() {
    let scheduler = scheduler();
    let (handle, hooks) = probe(ActionSpec::timed(secs(5.0)));
    assert!(scheduler.submit(&handle).unwrap());

    tick_by(&scheduler, secs(2.0));
    tick_by(&scheduler, secs(2.0));
    assert!(!handle.is_archived());
    tick_by(&scheduler, secs(2.0));

    assert_eq!(hooks.updates(), vec![secs(2.0), secs(2.0), secs(1.0)]);
    assert_eq!(hooks.all().last(), Some(&Hook::End));
    assert!(handle.is_archived());
}

#[test]
fn uneven_ticks_never_overshoot() {
    let scheduler = scheduler();
    let (handle, hooks) = probe(ActionSpec::timed(Duration::from_millis(1_000)));
    scheduler.submit(&handle).unwrap();

    for ms in [333, 333, 333, 333] {
        tick_by(&scheduler, Duration::from_millis(ms));
    }
    let total: Duration = hooks.updates().into_iter().sum();
    assert_eq!(total, Duration::from_millis(1_000));
    assert_eq!(hooks.updates().last(), Some(&Duration::from_millis(1)));
}

#[test]
fn frozen_time_is_not_replayed() {
    let scheduler = scheduler();
    let (handle, hooks) = probe(ActionSpec::timed(secs(2.0)).with_frozen(true));
    scheduler.submit(&handle).unwrap();

    tick_by(&scheduler, secs(30.0));
    handle.set_frozen(false);
    tick_by(&scheduler, secs(0.5));

    assert_eq!(hooks.updates(), vec![secs(0.5)]);
    assert_eq!(handle.remaining(), secs(1.5));
}

#[test]
fn ethernal_action_runs_until_ended() {
    let scheduler = scheduler();
    let (handle, hooks) = probe(ActionSpec::ethernal());
    scheduler.submit(&handle).unwrap();

    for _ in 0..10 {
        tick_by(&scheduler, secs(100.0));
    }
    assert!(handle.is_active());
    assert!(scheduler.end(&handle).unwrap());
    assert_eq!(hooks.count(&Hook::End), 1);
    assert_eq!(hooks.updates().len(), 10);
}
