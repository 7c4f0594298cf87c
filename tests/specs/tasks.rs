//! Background task specs
//!
//! Verify progress, single delivery of results and cooperative cancellation.

use crate::prelude::*;
use crate::prelude::assert_eq;
use ranger_core::{BackgroundTask, TaskControl, TaskError, TaskOutcome};
use std::sync::mpsc;
use std::time::Instant;

fn wait_until(what: &str, condition: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "{what} not reached in time");
        std::thread::sleep(Duration::from_millis(1));
    }
}

fn wait_done<O>(control: &TaskControl<O>) {
    wait_until("task completion", || control.is_done());
}

#[test]
fn progress_then_result_delivered_exactly_once() {
    let scheduler = scheduler();
    let (go_tx, go_rx) = mpsc::channel::<()>();
    let results = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&results);

    let task = BackgroundTask::new("R".to_string(), move |input, progress, _| {
        progress.report(0.3)?;
        go_rx.recv().map_err(TaskError::worker)?;
        progress.report(1.0)?;
        Ok(input)
    })
    .on_complete(move |outcome: &TaskOutcome<String>, _| {
        sink.lock().unwrap().push(outcome.value().cloned());
    });
    let control = task.control();
    let handle = task.into_handle();
    scheduler.submit(&handle).unwrap();

    wait_until("first progress report", || control.progress() == 0.3);
    tick_by(&scheduler, secs(0.1));
    assert!(results.lock().unwrap().is_empty());

    go_tx.send(()).unwrap();
    wait_done(&control);
    assert_eq!(control.progress(), 1.0);

    for _ in 0..3 {
        tick_by(&scheduler, secs(0.1));
    }
    assert_eq!(*results.lock().unwrap(), vec![Some("R".to_string())]);
    assert!(handle.is_archived());
    assert_eq!(scheduler.log().get(0).unwrap().reason, EndReason::Ended);
}

#[test]
fn forced_end_raises_cancellation() {
    let scheduler = scheduler();
    let task = BackgroundTask::new((), |_, _, cancel| {
        while !cancel.is_cancelled() {
            std::thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    });
    let control = task.control();
    let handle = task.into_handle();
    scheduler.submit(&handle).unwrap();

    scheduler.terminate(&handle).unwrap();
    wait_done(&control);
    assert_eq!(*control.outcome().unwrap(), TaskOutcome::Cancelled);
}

#[test]
fn shutdown_cancels_running_tasks() {
    let scheduler = scheduler();
    let task = BackgroundTask::new((), |_, _, cancel| {
        while !cancel.is_cancelled() {
            std::thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    });
    let control = task.control();
    scheduler.submit(&task.into_handle()).unwrap();

    scheduler.shutdown();
    assert!(control.is_cancel_requested());
    wait_done(&control);
}
