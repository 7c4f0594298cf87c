// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler error types

use crate::group::GroupError;
use crate::id::ActionId;
use crate::interceptor::InterceptorError;
use thiserror::Error;

/// Usage errors raised by scheduler operations
///
/// Vetoes and repeated terminations are not errors; they surface as
/// `Ok(false)`.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("{0} is already registered")]
    AlreadyRegistered(ActionId),
    #[error("{0} is already archived")]
    AlreadyArchived(ActionId),
    #[error("{0} was never admitted")]
    NotAdmitted(ActionId),
    #[error("scheduler is shut down")]
    ShutDown,
    #[error("update loop is already running")]
    AlreadyRunning,
    #[error("failed to spawn update loop: {0}")]
    Spawn(#[source] std::io::Error),
    #[error(transparent)]
    Group(#[from] GroupError),
    #[error(transparent)]
    Interceptor(#[from] InterceptorError),
}
