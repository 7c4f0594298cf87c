// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only termination log

use super::cursor::{Cursor, EntryFilter};
use crate::action::ActionHandle;
use crate::id::ActionId;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// How an action left the scheduler
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Remaining duration reached zero during a tick
    Expired,
    /// Ended explicitly, or instant
    Ended,
    /// Forced termination
    Terminated,
    /// Still active when the scheduler shut down
    Shutdown,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Expired => "expired",
            EndReason::Ended => "ended",
            EndReason::Terminated => "terminated",
            EndReason::Shutdown => "shutdown",
        }
    }

    /// Whether the natural `on_end` path ran
    pub fn is_natural(&self) -> bool {
        matches!(self, EndReason::Expired | EndReason::Ended)
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One terminated action
#[derive(Clone, Debug, Serialize)]
pub struct LogEntry {
    /// Position in the log, starting at 1
    pub sequence: u64,
    pub action_id: ActionId,
    pub name: String,
    pub group: String,
    /// Scheduler clock time since the scheduler was created
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
    pub reason: EndReason,
    pub tags: BTreeSet<String>,
    #[serde(skip)]
    action: ActionHandle,
}

impl LogEntry {
    /// The archived action itself
    pub fn action(&self) -> &ActionHandle {
        &self.action
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Shared append-only log of terminated actions
///
/// Clones share the same entries. Entries are never removed or reordered, so
/// an index stays valid for the life of the log.
#[derive(Clone, Default)]
pub struct TerminationLog {
    entries: Arc<RwLock<Vec<Arc<LogEntry>>>>,
}

impl TerminationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(
        &self,
        action: &ActionHandle,
        elapsed: Duration,
        reason: EndReason,
        tags: impl IntoIterator<Item = String>,
    ) -> Arc<LogEntry> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let entry = Arc::new(LogEntry {
            sequence: entries.len() as u64 + 1,
            action_id: action.id(),
            name: action.name().to_string(),
            group: action.group().name().to_string(),
            elapsed,
            reason,
            tags: tags.into_iter().collect(),
            action: action.clone(),
        });
        entries.push(Arc::clone(&entry));
        entry
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry at a zero-based index
    pub fn get(&self, index: usize) -> Option<Arc<LogEntry>> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(index)
            .cloned()
    }

    /// Snapshot of every entry so far
    pub fn entries(&self) -> Vec<Arc<LogEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Cursor positioned at the current tail
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.clone(), self.len(), None)
    }

    /// Cursor at the current tail that yields only matching entries
    pub fn cursor_filtered(
        &self,
        filter: impl Fn(&LogEntry) -> bool + Send + Sync + 'static,
    ) -> Cursor {
        let filter: Arc<EntryFilter> = Arc::new(filter);
        Cursor::new(self.clone(), self.len(), Some(filter))
    }
}

impl fmt::Debug for TerminationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminationLog")
            .field("len", &self.len())
            .finish()
    }
}
