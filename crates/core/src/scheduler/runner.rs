// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Update loop thread and shutdown

use super::lifecycle::Finish;
use super::{Inner, Scheduler};
use crate::action::Effects;
use crate::archive::EndReason;
use crate::clock::Clock;
use crate::error::SchedulerError;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};
use std::thread;
use std::time::{Duration, Instant};

impl<C: Clock> Scheduler<C> {
    /// Tick repeatedly on the calling thread until shutdown
    ///
    /// After each tick the thread sleeps for whatever is left of
    /// `min_period`; a slow tick is followed immediately by the next.
    pub fn run_loop(&self, min_period: Duration) -> Result<(), SchedulerError> {
        self.claim_loop()?;
        drive(Arc::downgrade(&self.inner), min_period);
        Ok(())
    }

    /// Run the update loop on a dedicated thread
    ///
    /// The thread holds only a weak reference: dropping every scheduler
    /// handle stops it as well.
    pub fn start(&self) -> Result<(), SchedulerError> {
        self.claim_loop()?;
        let weak = Arc::downgrade(&self.inner);
        let period = self.inner.config.min_period;
        let spawned = thread::Builder::new()
            .name(self.inner.config.thread_name.clone())
            .spawn(move || drive(weak, period));
        match spawned {
            Ok(handle) => {
                *self.inner.runner.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
                tracing::info!(
                    thread = %self.inner.config.thread_name,
                    min_period_ms = period.as_millis() as u64,
                    "update loop started"
                );
                Ok(())
            }
            Err(e) => {
                self.inner.running.store(false, Ordering::SeqCst);
                tracing::error!(error = %e, "failed to spawn update loop");
                Err(SchedulerError::Spawn(e))
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.is_closed()
    }

    /// Stop the loop and force-terminate every remaining action
    ///
    /// Each remaining action receives exactly one termination sequence with
    /// [`EndReason::Shutdown`]. Effects raised by those sequences are
    /// discarded. Later submissions fail with [`SchedulerError::ShutDown`].
    /// Calling this again is a no-op.
    pub fn shutdown(&self) {
        let inner = &self.inner;
        if inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        inner.running.store(false, Ordering::SeqCst);
        if let Some(looper) = inner.loop_thread.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            looper.unpark();
        }
        let runner = inner.runner.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = runner {
            if handle.thread().id() != thread::current().id() && handle.join().is_err() {
                tracing::error!("update loop thread panicked");
            }
        }

        let mut discarded = Effects::new();
        let (terminated, purged) = {
            let _seq = inner.lock_sequencer();
            let mut terminated = 0;
            for action in inner.snapshot() {
                if inner.finish_locked(&action, Finish::Forced, EndReason::Shutdown, &mut discarded) {
                    terminated += 1;
                }
            }
            (terminated, inner.purge())
        };
        if !discarded.is_empty() {
            tracing::debug!(discarded = discarded.len(), "discarding effects raised during shutdown");
        }
        tracing::info!(terminated, purged, "scheduler shut down");
    }

    fn claim_loop(&self) -> Result<(), SchedulerError> {
        if self.inner.is_closed() {
            return Err(SchedulerError::ShutDown);
        }
        self.inner
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|_| {
                tracing::error!("update loop already running");
                SchedulerError::AlreadyRunning
            })
    }
}

fn drive<C: Clock>(weak: Weak<Inner<C>>, min_period: Duration) {
    if let Some(inner) = weak.upgrade() {
        *inner.loop_thread.lock().unwrap_or_else(|e| e.into_inner()) = Some(thread::current());
    }

    loop {
        let Some(inner) = weak.upgrade() else {
            break;
        };
        if !inner.running.load(Ordering::SeqCst) || inner.is_closed() {
            inner.running.store(false, Ordering::SeqCst);
            *inner.loop_thread.lock().unwrap_or_else(|e| e.into_inner()) = None;
            break;
        }
        let started = Instant::now();
        // the strong reference lives only for the duration of one tick
        Scheduler { inner }.tick();

        let spent = started.elapsed();
        if spent < min_period {
            thread::park_timeout(min_period - spent);
        }
    }
    tracing::info!("update loop stopped");
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
