// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named partition tags used to scope interceptors
//!
//! Two groups are reserved in every registry: `All`, the wildcard whose
//! interceptors apply to every action, and `Ungrouped`, the default group of
//! actions constructed without one.

use crate::id::{GroupId, Sequence};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors raised by group creation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupError {
    #[error("group already exists: {0}")]
    Duplicate(String),
    #[error("group name must not be empty")]
    EmptyName,
}

const ALL: GroupId = GroupId(0);
const UNGROUPED: GroupId = GroupId(1);

/// Typed handle to a registered group
///
/// Equality and hashing use the id only; the name is for display.
#[derive(Clone, Debug)]
pub struct Group {
    id: GroupId,
    name: Arc<str>,
}

impl Group {
    /// The wildcard group
    pub fn all() -> Self {
        Self {
            id: ALL,
            name: Arc::from("All"),
        }
    }

    /// Default group of actions constructed without one
    pub fn ungrouped() -> Self {
        Self {
            id: UNGROUPED,
            name: Arc::from("Ungrouped"),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_all(&self) -> bool {
        self.id == ALL
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::ungrouped()
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Group {}

impl Hash for Group {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Name-keyed table of groups owned by a scheduler
#[derive(Clone, Debug)]
pub struct GroupRegistry {
    by_name: Arc<Mutex<HashMap<String, Group>>>,
    ids: Sequence,
}

impl GroupRegistry {
    pub fn new() -> Self {
        let mut by_name = HashMap::new();
        for group in [Group::all(), Group::ungrouped()] {
            by_name.insert(group.name().to_string(), group);
        }
        Self {
            by_name: Arc::new(Mutex::new(by_name)),
            ids: Sequence::starting_at(UNGROUPED.0 + 1),
        }
    }

    /// Create a group; each name may be created once
    pub fn create(&self, name: &str) -> Result<Group, GroupError> {
        if name.is_empty() {
            return Err(GroupError::EmptyName);
        }
        let mut by_name = self.by_name.lock().unwrap_or_else(|e| e.into_inner());
        if by_name.contains_key(name) {
            tracing::error!(group = name, "duplicate group name");
            return Err(GroupError::Duplicate(name.to_string()));
        }
        let group = Group {
            id: GroupId(self.ids.next()),
            name: Arc::from(name),
        };
        by_name.insert(name.to_string(), group.clone());
        tracing::debug!(group = name, id = %group.id, "group created");
        Ok(group)
    }

    pub fn get(&self, name: &str) -> Option<Group> {
        self.by_name
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.by_name.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;
