// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Total order over interceptors: ascending priority, then registration order

use crate::id::InterceptorId;
use std::cmp::Ordering;

/// Sort key of an interceptor
///
/// Priorities are finite (enforced at registration), so `total_cmp` agrees
/// with numeric order. Sequence ids are unique, so two keys compare equal
/// only when they belong to the same registration.
#[derive(Clone, Copy, Debug)]
pub struct PriorityKey {
    priority: f64,
    id: InterceptorId,
}

impl PriorityKey {
    pub fn new(priority: f64, id: InterceptorId) -> Self {
        // -0.0 + 0.0 == +0.0; keeps total_cmp from splitting the zeros
        Self {
            priority: priority + 0.0,
            id,
        }
    }

    pub fn priority(&self) -> f64 {
        self.priority
    }

    pub fn id(&self) -> InterceptorId {
        self.id
    }
}

impl PartialEq for PriorityKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriorityKey {}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.id.cmp(&other.id))
    }
}

/// Anything ordered by a [`PriorityKey`]
pub trait Prioritized {
    fn key(&self) -> PriorityKey;
}

impl Prioritized for PriorityKey {
    fn key(&self) -> PriorityKey {
        *self
    }
}

impl<T: Prioritized + ?Sized> Prioritized for std::sync::Arc<T> {
    fn key(&self) -> PriorityKey {
        (**self).key()
    }
}

impl<T: Prioritized + ?Sized> Prioritized for &T {
    fn key(&self) -> PriorityKey {
        (**self).key()
    }
}

pub fn compare<T: Prioritized + ?Sized>(a: &T, b: &T) -> Ordering {
    a.key().cmp(&b.key())
}
