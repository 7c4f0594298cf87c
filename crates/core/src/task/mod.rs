// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background task action
//!
//! Offloads work to its own thread. The scheduler polls the completion flag
//! each tick; once set, the completion reactions run with the outcome and the
//! action ends itself. Forced termination raises the cancellation token; the
//! worker is never killed.

mod progress;

pub use progress::{CancelToken, Progress, TaskError};

use crate::action::{Action, ActionContext, ActionHandle, ActionSpec};
use crate::group::Group;
use crate::unwind::contain;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// How background work finished
#[derive(Clone, Debug, PartialEq)]
pub enum TaskOutcome<O> {
    Completed(O),
    Failed(TaskError),
    /// Cancellation was requested before the worker returned
    Cancelled,
}

impl<O> TaskOutcome<O> {
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskOutcome::Completed(_))
    }

    pub fn value(&self) -> Option<&O> {
        match self {
            TaskOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TaskError> {
        match self {
            TaskOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            TaskOutcome::Completed(_) => "completed",
            TaskOutcome::Failed(_) => "failed",
            TaskOutcome::Cancelled => "cancelled",
        }
    }
}

type Worker<I, O> = Box<dyn FnOnce(I, Progress, CancelToken) -> Result<O, TaskError> + Send>;
type Reaction<O> = Box<dyn FnMut(&TaskOutcome<O>, &mut ActionContext) + Send>;

/// State shared between the action, its worker and any [`TaskControl`]
struct Shared<O> {
    done: AtomicBool,
    progress: Mutex<Option<Progress>>,
    outcome: Mutex<Option<Arc<TaskOutcome<O>>>>,
    cancel: CancelToken,
}

impl<O> Shared<O> {
    /// Store the outcome, then raise the completion flag
    fn publish(&self, outcome: TaskOutcome<O>) {
        *self.outcome.lock().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(outcome));
        self.done.store(true, Ordering::Release);
    }

    fn outcome(&self) -> Option<Arc<TaskOutcome<O>>> {
        self.outcome.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Observer and canceller for a background task, usable from any thread
pub struct TaskControl<O> {
    shared: Arc<Shared<O>>,
}

impl<O> Clone for TaskControl<O> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<O> TaskControl<O> {
    /// Last reported progress; zero before the worker starts
    pub fn progress(&self) -> f64 {
        self.shared
            .progress
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map_or(0.0, Progress::get)
    }

    pub fn is_done(&self) -> bool {
        self.shared.done.load(Ordering::Acquire)
    }

    /// Ask the worker to stop; it observes the request through its token
    pub fn cancel(&self) {
        self.shared.cancel.cancel();
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// The published outcome, once the worker finished
    pub fn outcome(&self) -> Option<Arc<TaskOutcome<O>>> {
        if self.is_done() {
            self.shared.outcome()
        } else {
            None
        }
    }
}

/// An action wrapping one unit of background work
///
/// Always ethernal, never deniable and never reactable.
pub struct BackgroundTask<I, O> {
    name: String,
    input: Option<I>,
    worker: Option<Worker<I, O>>,
    reactions: Vec<Reaction<O>>,
    shared: Arc<Shared<O>>,
    thread: Option<JoinHandle<()>>,
    delivered: bool,
}

impl<I, O> BackgroundTask<I, O>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
{
    pub fn new(
        input: I,
        worker: impl FnOnce(I, Progress, CancelToken) -> Result<O, TaskError> + Send + 'static,
    ) -> Self {
        Self {
            name: "BackgroundTask".to_string(),
            input: Some(input),
            worker: Some(Box::new(worker)),
            reactions: Vec::new(),
            shared: Arc::new(Shared {
                done: AtomicBool::new(false),
                progress: Mutex::new(None),
                outcome: Mutex::new(None),
                cancel: CancelToken::new(),
            }),
            thread: None,
            delivered: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Run `reaction` with the outcome on the first tick after completion
    pub fn on_complete(
        mut self,
        reaction: impl FnMut(&TaskOutcome<O>, &mut ActionContext) + Send + 'static,
    ) -> Self {
        self.reactions.push(Box::new(reaction));
        self
    }

    pub fn control(&self) -> TaskControl<O> {
        TaskControl {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Wrap in a handle with the background spec
    pub fn into_handle(self) -> ActionHandle {
        self.into_handle_in(Group::ungrouped())
    }

    pub fn into_handle_in(self, group: Group) -> ActionHandle {
        ActionHandle::new(ActionSpec::background().with_group(group), self)
    }

    fn spawn_worker(&mut self, ctx: &ActionContext) {
        let (Some(input), Some(worker)) = (self.input.take(), self.worker.take()) else {
            return;
        };
        let id = ctx.id();
        let progress = Progress::new(id);
        *self.shared.progress.lock().unwrap_or_else(|e| e.into_inner()) = Some(progress.clone());

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name(format!("ranger-task-{}", id.0))
            .spawn(move || {
                let token = shared.cancel.clone();
                let result = contain(|| worker(input, progress, token));
                let outcome = if shared.cancel.is_cancelled() {
                    TaskOutcome::Cancelled
                } else {
                    match result {
                        Ok(Ok(value)) => TaskOutcome::Completed(value),
                        Ok(Err(error)) => TaskOutcome::Failed(error),
                        Err(message) => {
                            tracing::error!(action_id = %id, panic = %message, "background worker panicked");
                            TaskOutcome::Failed(TaskError::Panicked(message))
                        }
                    }
                };
                shared.publish(outcome);
            });

        match spawned {
            Ok(handle) => {
                tracing::debug!(action_id = %id, "background worker started");
                self.thread = Some(handle);
            }
            Err(e) => {
                tracing::error!(action_id = %id, error = %e, "failed to spawn background worker");
                self.shared
                    .publish(TaskOutcome::Failed(TaskError::Spawn(e.to_string())));
            }
        }
    }
}

impl<I, O> Action for BackgroundTask<I, O>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_start(&mut self, ctx: &mut ActionContext) {
        self.spawn_worker(ctx);
    }

    fn on_update(&mut self, _elapsed: std::time::Duration, ctx: &mut ActionContext) {
        if self.delivered || !self.shared.done.load(Ordering::Acquire) {
            return;
        }
        let Some(outcome) = self.shared.outcome() else {
            return;
        };
        self.delivered = true;
        tracing::debug!(action_id = %ctx.id(), outcome = outcome.tag(), "background task finished");
        for reaction in &mut self.reactions {
            reaction(outcome.as_ref(), ctx);
        }
        ctx.end();
    }

    fn on_end(&mut self, _ctx: &mut ActionContext) {
        if self.shared.done.load(Ordering::Acquire) {
            if let Some(handle) = self.thread.take() {
                let _ = handle.join();
            }
        } else {
            // ended before the worker returned: nobody will read the result
            self.shared.cancel.cancel();
        }
    }

    fn on_terminate(&mut self, ctx: &mut ActionContext) {
        if !self.shared.done.load(Ordering::Acquire) {
            tracing::warn!(action_id = %ctx.id(), "cancelling background task");
        }
        self.shared.cancel.cancel();
    }

    fn log_tags(&self) -> Vec<String> {
        let state = self
            .shared
            .outcome()
            .map_or("pending", |outcome| outcome.tag());
        vec!["background".to_string(), state.to_string()]
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
