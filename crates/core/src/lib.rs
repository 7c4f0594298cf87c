// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ranger-core: timed-effect scheduler
//!
//! This crate provides:
//! - The action contract: timing state machine plus lifecycle hooks
//! - A scheduler driving active actions by elapsed clock time on its own thread
//! - Priority-ordered, group-scoped admission and termination interceptors
//! - Background task actions with progress, results and cooperative cancellation
//! - An append-only termination log with incremental cursors

pub mod clock;
pub mod config;
pub mod id;

pub mod group;
pub mod merge;
pub mod modifiers;
pub mod order;

// Core (order matters for dependencies)
pub mod action;
pub mod interceptor;
pub mod archive;
pub mod error;
pub mod scheduler;
pub mod task;

mod unwind;

// Re-exports
pub use action::{
    Action, ActionContext, ActionHandle, ActionSpec, ActionState, Effect, Effects, Phase, Step,
    TriggerCode,
};
pub use archive::{Batch, Cursor, EndReason, LogEntry, TerminationLog};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, SchedulerConfig};
pub use error::SchedulerError;
pub use group::{Group, GroupError, GroupRegistry};
pub use id::{ActionId, GroupId, InterceptorId};
pub use interceptor::{
    Admission, AdmissionChain, InterceptorError, InterceptorHandle, Registration,
    TerminationChain, Verdict,
};
pub use modifiers::Modifiers;
pub use order::{PriorityKey, Prioritized};
pub use scheduler::{Scheduler, TickSummary};
pub use task::{BackgroundTask, CancelToken, Progress, TaskControl, TaskError, TaskOutcome};
