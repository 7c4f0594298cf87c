// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registration sequence numbers
//!
//! Every action, interceptor and group receives a number from a monotonically
//! increasing sequence. Interceptor numbers double as the priority tie-break.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared monotonically increasing counter
#[derive(Clone, Debug)]
pub struct Sequence {
    next: Arc<AtomicU64>,
}

impl Sequence {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

macro_rules! sequence_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }
    };
}

sequence_id!(
    /// Identity of an action, assigned at construction
    ActionId,
    "action"
);
sequence_id!(
    /// Identity of a registered admission or termination interceptor
    InterceptorId,
    "interceptor"
);
sequence_id!(
    /// Identity of a group within its registry
    GroupId,
    "group"
);

static ACTION_IDS: AtomicU64 = AtomicU64::new(1);

impl ActionId {
    /// Next id from the process-wide action sequence
    pub(crate) fn next() -> Self {
        Self(ACTION_IDS.fetch_add(1, Ordering::SeqCst))
    }
}
