// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Priority-ordered, group-scoped interceptor chains
//!
//! This module provides:
//! - `AdmissionChain` - rangers that may rewrite modifiers and veto admission
//! - `TerminationChain` - end rangers reacting to every termination
//!
//! Both keep one sorted set per group. A walk merges the wildcard `All` set
//! with the action's own group set lazily, in priority order.

mod admission;
mod termination;

pub use admission::{Admission, AdmissionChain, DecideFn, Ranger, Verdict};
pub use termination::{EndRanger, Notified, ReactFn, TerminationChain};

use crate::action::ActionHandle;
use crate::group::Group;
use crate::id::{InterceptorId, Sequence};
use crate::merge::merge_prioritized;
use crate::order::{PriorityKey, Prioritized};
use std::collections::{BTreeMap, HashMap};
use std::ops::ControlFlow;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors raised by interceptor registration
#[derive(Debug, Error, PartialEq)]
pub enum InterceptorError {
    #[error("interceptor priority must be finite, got {0}")]
    NonFinitePriority(f64),
}

/// Applicability test shared by both chains
pub type ScopeFn = dyn Fn(&ActionHandle) -> bool + Send + Sync;

/// Registration options shared by both chains
#[derive(Clone, Debug)]
pub struct Registration {
    pub name: String,
    pub priority: f64,
    pub group: Group,
}

impl Registration {
    /// Defaults: priority 1, applies to every group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 1.0,
            group: Group::all(),
        }
    }

    pub fn priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    pub fn group(mut self, group: Group) -> Self {
        self.group = group;
        self
    }
}

/// Returned by registration; identifies the record for removal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterceptorHandle {
    key: PriorityKey,
    group: Group,
}

impl InterceptorHandle {
    pub fn id(&self) -> InterceptorId {
        self.key.id()
    }

    pub fn priority(&self) -> f64 {
        self.key.priority()
    }

    pub fn group(&self) -> &Group {
        &self.group
    }
}

type SortedSet<T> = BTreeMap<PriorityKey, Arc<T>>;

/// Per-group sorted sets with copy-on-write snapshots
///
/// A walk clones the two relevant `Arc`s and iterates them without holding
/// the lock, so reactions may query or register freely. Records registered
/// during a walk are seen by the next one.
struct InterceptorSet<T> {
    by_group: RwLock<HashMap<Group, Arc<SortedSet<T>>>>,
    ids: Sequence,
}

impl<T: Prioritized> InterceptorSet<T> {
    fn new() -> Self {
        Self {
            by_group: RwLock::new(HashMap::new()),
            ids: Sequence::default(),
        }
    }

    fn next_key(&self, priority: f64) -> Result<PriorityKey, InterceptorError> {
        if !priority.is_finite() {
            tracing::error!(priority, "rejected interceptor with non-finite priority");
            return Err(InterceptorError::NonFinitePriority(priority));
        }
        Ok(PriorityKey::new(priority, InterceptorId(self.ids.next())))
    }

    fn insert(&self, group: Group, record: T) -> InterceptorHandle {
        let key = record.key();
        let mut by_group = self.by_group.write().unwrap_or_else(|e| e.into_inner());
        let set = by_group.entry(group.clone()).or_default();
        Arc::make_mut(set).insert(key, Arc::new(record));
        InterceptorHandle { key, group }
    }

    fn remove(&self, handle: &InterceptorHandle) -> bool {
        let mut by_group = self.by_group.write().unwrap_or_else(|e| e.into_inner());
        let Some(set) = by_group.get_mut(&handle.group) else {
            return false;
        };
        let removed = Arc::make_mut(set).remove(&handle.key).is_some();
        if set.is_empty() {
            by_group.remove(&handle.group);
        }
        removed
    }

    fn snapshot(&self, group: &Group) -> [Option<Arc<SortedSet<T>>>; 2] {
        let by_group = self.by_group.read().unwrap_or_else(|e| e.into_inner());
        let all = by_group.get(&Group::all()).cloned();
        let own = if group.is_all() {
            None
        } else {
            by_group.get(group).cloned()
        };
        [all, own]
    }

    /// Visit records applicable to `group` in priority order until `visit`
    /// breaks
    fn walk<B>(&self, group: &Group, mut visit: impl FnMut(&T) -> ControlFlow<B>) -> ControlFlow<B> {
        let sets = self.snapshot(group);
        let sources = sets.iter().flatten().map(|set| set.values());
        for record in merge_prioritized(sources) {
            if let ControlFlow::Break(b) = visit(&**record) {
                return ControlFlow::Break(b);
            }
        }
        ControlFlow::Continue(())
    }

    fn len(&self) -> usize {
        self.by_group
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .map(|set| set.len())
            .sum()
    }
}

#[cfg(test)]
#[path = "interceptor_tests.rs"]
mod tests;
