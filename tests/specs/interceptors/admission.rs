//! Admission interceptor specs
//!
//! Verify veto, override and short-circuit behavior of rangers.

use crate::prelude::*;
use crate::prelude::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn group_veto_denies_deniable_action() {
    let scheduler = scheduler();
    let g = scheduler.create_group("G").unwrap();
    scheduler
        .register_ranger(
            Registration::new("stunned").priority(1.0).group(g.clone()),
            |_| true,
            |_, _| Verdict::Veto,
        )
        .unwrap();

    let (handle, hooks) = probe(ActionSpec::timed(secs(1.0)).with_group(g));
    assert!(!scheduler.submit(&handle).unwrap());

    assert!(hooks.all().is_empty());
    assert!(scheduler.log().is_empty());
    assert!(!handle.is_active());
}

#[test]
fn veto_on_another_group_does_not_apply() {
    let scheduler = scheduler();
    let g = scheduler.create_group("G").unwrap();
    let other = scheduler.create_group("H").unwrap();
    scheduler
        .register_ranger(Registration::new("stunned").group(g), |_| true, |_, _| {
            Verdict::Veto
        })
        .unwrap();

    let (handle, _) = probe(ActionSpec::timed(secs(1.0)).with_group(other));
    assert!(scheduler.submit(&handle).unwrap());
}

#[test]
fn non_deniable_action_is_always_admitted() {
    let scheduler = scheduler();
    let g = scheduler.create_group("G").unwrap();
    scheduler
        .register_ranger(Registration::new("all"), |_| true, |_, _| Verdict::Veto)
        .unwrap();
    scheduler
        .register_ranger(Registration::new("g").group(g.clone()), |_| true, |_, _| {
            Verdict::Veto
        })
        .unwrap();

    let (handle, hooks) = probe(ActionSpec::timed(secs(1.0)).with_group(g).with_deniable(false));
    assert!(scheduler.submit(&handle).unwrap());
    assert_eq!(hooks.all(), vec![Hook::Start]);
}

#[test]
fn first_veto_short_circuits_the_chain() {
    let scheduler = scheduler();
    let later = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&later);
    scheduler
        .register_ranger(Registration::new("a").priority(0.5), |_| true, |_, _| {
            Verdict::Veto
        })
        .unwrap();
    scheduler
        .register_ranger(Registration::new("b").priority(2.0), |_| true, move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Verdict::Allow
        })
        .unwrap();

    let (handle, _) = probe(ActionSpec::timed(secs(1.0)));
    assert!(!scheduler.submit(&handle).unwrap());
    assert_eq!(later.load(Ordering::SeqCst), 0);
}

#[test]
fn rangers_run_in_priority_order_across_groups() {
    let scheduler = scheduler();
    let g = scheduler.create_group("G").unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));
    for (name, priority, group) in [
        ("g-late", 3.0, Some(g.clone())),
        ("all-mid", 2.0, None),
        ("g-early", 1.0, Some(g.clone())),
        ("all-tie", 2.0, None),
    ] {
        let sink = Arc::clone(&order);
        let registration = match group {
            Some(group) => Registration::new(name).priority(priority).group(group),
            None => Registration::new(name).priority(priority),
        };
        scheduler
            .register_ranger(registration, |_| true, move |_, _| {
                sink.lock().unwrap().push(name);
                Verdict::Allow
            })
            .unwrap();
    }

    let (handle, _) = probe(ActionSpec::timed(secs(1.0)).with_group(g));
    scheduler.submit(&handle).unwrap();
    assert_eq!(
        *order.lock().unwrap(),
        vec!["g-early", "all-mid", "all-tie", "g-late"]
    );
}
