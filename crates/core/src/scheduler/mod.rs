// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scheduler: active registry, update loop and lifecycle orchestration
//!
//! Locking: the sequencer serializes admission, termination sequences and
//! registry purges. Per-action locks guard hooks and timing (see
//! [`ActionHandle`]). The registry lock is a leaf and only held to copy or
//! edit membership.
//!
//! Hooks and termination reactions never call back into the scheduler. Their
//! [`Effects`](crate::action::Effects) are applied after the triggering
//! operation has released every lock.

mod lifecycle;
mod runner;
mod tick;

#[cfg(test)]
pub(crate) mod test_support;

pub use tick::TickSummary;

use crate::action::{ActionHandle, Effects};
use crate::archive::{Cursor, LogEntry, TerminationLog};
use crate::clock::{Clock, SystemClock};
use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::group::{Group, GroupRegistry};
use crate::interceptor::{
    AdmissionChain, InterceptorHandle, Registration, TerminationChain, Verdict,
};
use crate::modifiers::Modifiers;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{JoinHandle, Thread};
use std::time::{Duration, Instant};

struct Inner<C: Clock> {
    config: SchedulerConfig,
    clock: C,
    epoch: Instant,
    sequencer: Mutex<()>,
    /// Admitted actions in admission order; purge is the only removal path
    registry: Mutex<Vec<ActionHandle>>,
    groups: GroupRegistry,
    admission: AdmissionChain,
    termination: TerminationChain,
    log: TerminationLog,
    running: AtomicBool,
    closed: AtomicBool,
    runner: Mutex<Option<JoinHandle<()>>>,
    loop_thread: Mutex<Option<Thread>>,
}

impl<C: Clock> Inner<C> {
    fn lock_sequencer(&self) -> MutexGuard<'_, ()> {
        self.sequencer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_registry(&self) -> MutexGuard<'_, Vec<ActionHandle>> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn snapshot(&self) -> Vec<ActionHandle> {
        self.lock_registry().clone()
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Owns the active actions and drives them by elapsed clock time
///
/// Clones share the same scheduler.
pub struct Scheduler<C: Clock = SystemClock> {
    inner: Arc<Inner<C>>,
}

impl<C: Clock> Clone for Scheduler<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Scheduler<SystemClock> {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for Scheduler<SystemClock> {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn with_clock(config: SchedulerConfig, clock: C) -> Self {
        let epoch = clock.now();
        Self {
            inner: Arc::new(Inner {
                config,
                clock,
                epoch,
                sequencer: Mutex::new(()),
                registry: Mutex::new(Vec::new()),
                groups: GroupRegistry::new(),
                admission: AdmissionChain::new(),
                termination: TerminationChain::new(),
                log: TerminationLog::new(),
                running: AtomicBool::new(false),
                closed: AtomicBool::new(false),
                runner: Mutex::new(None),
                loop_thread: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    pub fn clock(&self) -> &C {
        &self.inner.clock
    }

    /// Clock time since the scheduler was created
    pub fn elapsed(&self) -> Duration {
        self.inner.clock.since(self.inner.epoch)
    }

    // -- groups --

    pub fn create_group(&self, name: &str) -> Result<Group, SchedulerError> {
        Ok(self.inner.groups.create(name)?)
    }

    pub fn group(&self, name: &str) -> Option<Group> {
        self.inner.groups.get(name)
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.inner.groups
    }

    // -- interceptors --

    /// Register an admission interceptor
    ///
    /// `decide` runs with the scheduler's sequencer held: it may query the
    /// scheduler but must not submit, end or terminate actions.
    pub fn register_ranger(
        &self,
        registration: Registration,
        scope: impl Fn(&ActionHandle) -> bool + Send + Sync + 'static,
        decide: impl Fn(&ActionHandle, &mut Modifiers) -> Verdict + Send + Sync + 'static,
    ) -> Result<InterceptorHandle, SchedulerError> {
        Ok(self.inner.admission.register(registration, scope, decide)?)
    }

    /// Register a termination interceptor; follow-up work goes into `Effects`
    pub fn register_end_ranger(
        &self,
        registration: Registration,
        scope: impl Fn(&ActionHandle) -> bool + Send + Sync + 'static,
        react: impl Fn(&ActionHandle, &mut Effects) + Send + Sync + 'static,
    ) -> Result<InterceptorHandle, SchedulerError> {
        Ok(self.inner.termination.register(registration, scope, react)?)
    }

    pub fn remove_ranger(&self, handle: &InterceptorHandle) -> bool {
        self.inner.admission.remove(handle)
    }

    pub fn remove_end_ranger(&self, handle: &InterceptorHandle) -> bool {
        self.inner.termination.remove(handle)
    }

    pub fn admission_chain(&self) -> &AdmissionChain {
        &self.inner.admission
    }

    pub fn termination_chain(&self) -> &TerminationChain {
        &self.inner.termination
    }

    // -- queries --

    /// First active action matching `predicate`, in admission order
    pub fn find(&self, predicate: impl Fn(&ActionHandle) -> bool) -> Option<ActionHandle> {
        self.inner
            .snapshot()
            .into_iter()
            .find(|a| a.is_active() && predicate(a))
    }

    /// Every active action matching `predicate`
    pub fn find_all(&self, predicate: impl Fn(&ActionHandle) -> bool) -> Vec<ActionHandle> {
        self.inner
            .snapshot()
            .into_iter()
            .filter(|a| a.is_active() && predicate(a))
            .collect()
    }

    pub fn any(&self, predicate: impl Fn(&ActionHandle) -> bool) -> bool {
        self.find(predicate).is_some()
    }

    /// Snapshot of every active action
    pub fn active(&self) -> Vec<ActionHandle> {
        self.find_all(|_| true)
    }

    pub fn active_count(&self) -> usize {
        self.active().len()
    }

    // -- termination log --

    pub fn log(&self) -> &TerminationLog {
        &self.inner.log
    }

    /// Cursor at the current log tail
    pub fn cursor(&self) -> Cursor {
        self.inner.log.cursor()
    }

    pub fn cursor_filtered(
        &self,
        filter: impl Fn(&LogEntry) -> bool + Send + Sync + 'static,
    ) -> Cursor {
        self.inner.log.cursor_filtered(filter)
    }
}

impl<C: Clock> fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("registered", &self.inner.lock_registry().len())
            .field("running", &self.inner.running.load(Ordering::SeqCst))
            .field("closed", &self.inner.is_closed())
            .field("log", &self.inner.log)
            .finish()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
