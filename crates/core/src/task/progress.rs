// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channels between a background worker and its action

use crate::id::ActionId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Failures of background work
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskError {
    #[error("progress must lie in [0, 1], got {0}")]
    ProgressOutOfRange(f64),
    #[error("worker failed: {0}")]
    Worker(String),
    #[error("worker panicked: {0}")]
    Panicked(String),
    #[error("failed to spawn worker thread: {0}")]
    Spawn(String),
}

impl TaskError {
    /// Wrap any displayable worker error
    pub fn worker(error: impl std::fmt::Display) -> Self {
        TaskError::Worker(error.to_string())
    }
}

/// Progress reporter handed to the worker
#[derive(Clone, Debug)]
pub struct Progress {
    task: ActionId,
    value: Arc<Mutex<f64>>,
}

impl Progress {
    pub(crate) fn new(task: ActionId) -> Self {
        Self {
            task,
            value: Arc::new(Mutex::new(0.0)),
        }
    }

    /// Publish partial progress; only values in `[0, 1]` are accepted
    pub fn report(&self, value: f64) -> Result<(), TaskError> {
        if !(0.0..=1.0).contains(&value) {
            tracing::error!(action_id = %self.task, value, "progress out of range");
            return Err(TaskError::ProgressOutOfRange(value));
        }
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = value;
        tracing::trace!(action_id = %self.task, value, "progress");
        Ok(())
    }

    pub fn get(&self) -> f64 {
        *self.value.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Cooperative cancellation flag; the worker polls it at its own pace
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    requested: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}
