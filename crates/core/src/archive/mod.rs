// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Termination log and its cursors

mod cursor;
mod log;

pub use cursor::{Batch, BatchIter, Cursor, EntryFilter};
pub use log::{EndReason, LogEntry, TerminationLog};

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
