// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental per-consumer reads of the termination log

use super::log::{LogEntry, TerminationLog};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

pub type EntryFilter = dyn Fn(&LogEntry) -> bool + Send + Sync;

/// Read position into a [`TerminationLog`]
///
/// Starts at the log tail when created and only moves forward. Each poll
/// hands back the entries appended since the previous poll.
pub struct Cursor {
    log: TerminationLog,
    next: usize,
    filter: Option<Arc<EntryFilter>>,
}

impl Cursor {
    pub(crate) fn new(log: TerminationLog, next: usize, filter: Option<Arc<EntryFilter>>) -> Self {
        Self { log, next, filter }
    }

    /// Entries appended since the last poll
    ///
    /// The cursor moves past everything present now, matching or not. The
    /// returned batch covers a fixed range and may be iterated any number of
    /// times.
    pub fn poll(&mut self) -> Batch {
        let end = self.log.len();
        let range = self.next..end;
        self.next = end;
        Batch {
            log: self.log.clone(),
            range,
            filter: self.filter.clone(),
        }
    }

    /// Whether a poll now would yield anything; does not move the cursor
    pub fn has_new(&self) -> bool {
        (self.next..self.log.len())
            .filter_map(|i| self.log.get(i))
            .any(|entry| accepts(self.filter.as_deref(), &entry))
    }

    /// Number of log entries already passed
    pub fn position(&self) -> usize {
        self.next
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("next", &self.next)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

fn accepts(filter: Option<&EntryFilter>, entry: &LogEntry) -> bool {
    filter.map_or(true, |f| f(entry))
}

/// Entries from one poll, read lazily from the log
#[derive(Clone)]
pub struct Batch {
    log: TerminationLog,
    range: Range<usize>,
    filter: Option<Arc<EntryFilter>>,
}

impl Batch {
    pub fn iter(&self) -> BatchIter<'_> {
        BatchIter {
            batch: self,
            index: self.range.start,
        }
    }

    /// Log entries examined by this poll, before filtering
    pub fn examined(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn to_vec(&self) -> Vec<Arc<LogEntry>> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = Arc<LogEntry>;
    type IntoIter = BatchIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batch").field("range", &self.range).finish()
    }
}

pub struct BatchIter<'a> {
    batch: &'a Batch,
    index: usize,
}

impl Iterator for BatchIter<'_> {
    type Item = Arc<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.batch.range.end {
            let entry = self.batch.log.get(self.index);
            self.index += 1;
            match entry {
                Some(entry) if accepts(self.batch.filter.as_deref(), &entry) => return Some(entry),
                _ => continue,
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.batch.range.end.saturating_sub(self.index)))
    }
}
