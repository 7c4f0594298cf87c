//! Leaf action specs
//!
//! Verify the small actions built on the public action contract.

use crate::prelude::*;
use crate::prelude::assert_eq;
use ranger_actions::{Await, Delay, Post, Signal};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};

#[test]
fn delay_reacts_after_its_duration() {
    let scheduler = scheduler();
    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    let delay = Delay::new(secs(1.5))
        .then(move |_| flag.store(true, Ordering::SeqCst))
        .into_handle();
    scheduler.submit(&delay).unwrap();

    tick_by(&scheduler, secs(1.0));
    assert!(!fired.load(Ordering::SeqCst));
    tick_by(&scheduler, secs(1.0));
    assert!(fired.load(Ordering::SeqCst));
}

#[test]
fn await_fires_a_delay_when_ready() {
    let scheduler = scheduler();
    let ready = Arc::new(AtomicBool::new(false));
    let fired = Arc::new(AtomicBool::new(false));
    let (flag, done) = (Arc::clone(&ready), Arc::clone(&fired));

    let waiter = Await::until(move || flag.load(Ordering::SeqCst))
        .then(move |ctx| {
            let delay = Delay::new(secs(1.0)).then(move |_| done.store(true, Ordering::SeqCst));
            ctx.effects().submit(delay.into_handle());
        })
        .into_handle();
    scheduler.submit(&waiter).unwrap();

    tick_by(&scheduler, secs(5.0));
    assert!(waiter.is_active());
    ready.store(true, Ordering::SeqCst);
    tick_by(&scheduler, secs(0.1));
    assert!(waiter.is_archived());
    tick_by(&scheduler, secs(1.0));
    assert!(fired.load(Ordering::SeqCst));
}

#[test]
fn announcements_reach_log_consumers() {
    let scheduler = scheduler();
    let mut posts = scheduler.cursor_filtered(|e| e.has_tag("post"));
    let mut signals = scheduler.cursor_filtered(|e| e.has_tag("signal:levelup"));

    scheduler
        .submit(&Post::new("loot", json!(["sword"])).into_handle())
        .unwrap();
    scheduler
        .submit(&Signal::new("levelup").with_detail("level", 3).into_handle())
        .unwrap();
    scheduler
        .submit(&Signal::new("ignored").into_handle())
        .unwrap();

    let loot: Vec<_> = posts
        .poll()
        .iter()
        .filter_map(|e| e.action().inspect(|p: &Post| p.payload().clone()))
        .collect();
    assert_eq!(loot, vec![json!(["sword"])]);

    let levels: Vec<_> = signals
        .poll()
        .iter()
        .filter_map(|e| e.action().inspect(|s: &Signal| s.detail("level").cloned()))
        .flatten()
        .collect();
    assert_eq!(levels, vec![json!(3)]);
}

struct Stun;

impl Action for Stun {}

#[test]
fn await_can_wait_for_a_type_of_action_to_end() {
    let scheduler = scheduler();
    let freed = Arc::new(AtomicBool::new(false));
    let (query, flag) = (scheduler.clone(), Arc::clone(&freed));
    let waiter = Await::until(move || !query.any(|a| a.is::<Stun>()))
        .then(move |_| flag.store(true, Ordering::SeqCst))
        .into_handle();
    scheduler.submit(&waiter).unwrap();
    scheduler
        .submit(&ActionHandle::new(ActionSpec::timed(secs(1.0)), Stun))
        .unwrap();

    let ticker = scheduler.clone();
    let (done_tx, done_rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        for _ in 0..3 {
            tick_by(&ticker, secs(0.6));
        }
        let _ = done_tx.send(());
    });
    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("ticks did not return");

    assert!(freed.load(Ordering::SeqCst));
    assert!(waiter.is_archived());
}
