//! Termination interceptor specs
//!
//! Verify that end rangers all run and may start follow-up work.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn every_end_ranger_runs_even_when_one_panics() {
    let scheduler = scheduler();
    let seen = Arc::new(Mutex::new(Vec::new()));
    for (name, priority) in [("first", 0.0), ("second", 1.0)] {
        let sink = Arc::clone(&seen);
        scheduler
            .register_end_ranger(
                Registration::new(name).priority(priority),
                |_| true,
                move |_, _| sink.lock().unwrap().push(name),
            )
            .unwrap();
    }
    scheduler
        .register_end_ranger(Registration::new("broken").priority(0.5), |_| true, |_, _| {
            panic!("reaction failed")
        })
        .unwrap();

    let (handle, _) = probe(ActionSpec::ethernal());
    scheduler.submit(&handle).unwrap();
    assert!(scheduler.terminate(&handle).unwrap());

    assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    assert_eq!(scheduler.log().len(), 1);
}

#[test]
fn end_ranger_follow_up_is_admitted_after_the_sequence() {
    let scheduler = scheduler();
    let burning = scheduler.create_group("burning").unwrap();
    let (ash, ash_hooks) = probe(ActionSpec::timed(secs(3.0)));
    let queued = ash.clone();
    scheduler
        .register_end_ranger(
            Registration::new("ash").group(burning.clone()),
            |_| true,
            move |_, effects| effects.submit(queued.clone()),
        )
        .unwrap();

    let (fire, _) = probe(ActionSpec::timed(secs(1.0)).with_group(burning));
    scheduler.submit(&fire).unwrap();
    tick_by(&scheduler, secs(1.0));

    assert!(fire.is_archived());
    assert!(ash.is_active());
    assert_eq!(ash_hooks.all(), vec![Hook::Start]);
}

#[test]
fn scope_predicate_filters_end_rangers() {
    let scheduler = scheduler();
    let count = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&count);
    scheduler
        .register_end_ranger(
            Registration::new("timed-only"),
            |a| !a.is_ethernal(),
            move |_, _| *sink.lock().unwrap() += 1,
        )
        .unwrap();

    let (timed, _) = probe(ActionSpec::timed(secs(1.0)));
    let (ethernal, _) = probe(ActionSpec::ethernal());
    scheduler.submit(&timed).unwrap();
    scheduler.submit(&ethernal).unwrap();
    scheduler.end(&timed).unwrap();
    scheduler.end(&ethernal).unwrap();

    assert_eq!(*count.lock().unwrap(), 1);
}
