// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared handle to an action and its per-action locks
//!
//! Lock order, outermost first: scheduler sequencer, behavior, state. The
//! registry membership lock is a leaf and never held while taking another.
//! Hooks run with the behavior lock held and the state lock released, so
//! reading state from inside a hook is safe. Type checks never lock, and
//! `inspect` gives up instead of waiting on a behavior that is busy.

use super::spec::ActionSpec;
use super::state::ActionState;
use super::{Action, AsAny};
use crate::group::Group;
use crate::id::ActionId;
use std::any::TypeId;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::Duration;

struct ActionCell {
    id: ActionId,
    group: Group,
    name: String,
    /// Concrete type of the behavior, fixed at construction
    type_id: TypeId,
    type_name: &'static str,
    /// Set once when the termination sequence starts; makes it run once
    retiring: AtomicBool,
    state: Mutex<ActionState>,
    behavior: Mutex<Box<dyn Action>>,
}

/// Cloneable reference to an action, valid across its whole lifecycle
#[derive(Clone)]
pub struct ActionHandle {
    cell: Arc<ActionCell>,
}

impl ActionHandle {
    pub fn new(spec: ActionSpec, action: impl Action) -> Self {
        Self::boxed(spec, Box::new(action))
    }

    pub fn boxed(spec: ActionSpec, action: Box<dyn Action>) -> Self {
        let name = action.name().to_string();
        let behavior: &dyn Action = &*action;
        let type_id = AsAny::as_any(behavior).type_id();
        let type_name = AsAny::type_name(behavior);
        Self {
            cell: Arc::new(ActionCell {
                id: ActionId::next(),
                group: spec.group().clone(),
                name,
                type_id,
                type_name,
                retiring: AtomicBool::new(false),
                state: Mutex::new(ActionState::from_spec(&spec)),
                behavior: Mutex::new(action),
            }),
        }
    }

    pub fn id(&self) -> ActionId {
        self.cell.id
    }

    pub fn group(&self) -> &Group {
        &self.cell.group
    }

    pub fn name(&self) -> &str {
        &self.cell.name
    }

    /// Point-in-time copy of the timing state
    pub fn state(&self) -> ActionState {
        self.lock_state().clone()
    }

    pub fn remaining(&self) -> Duration {
        self.lock_state().remaining()
    }

    pub fn total_duration(&self) -> Duration {
        self.lock_state().total_duration()
    }

    pub fn is_active(&self) -> bool {
        !self.is_retiring() && self.lock_state().is_active()
    }

    pub fn is_archived(&self) -> bool {
        self.lock_state().is_archived()
    }

    pub fn is_frozen(&self) -> bool {
        self.lock_state().is_frozen()
    }

    pub fn is_ethernal(&self) -> bool {
        self.lock_state().is_ethernal()
    }

    pub fn set_frozen(&self, frozen: bool) {
        self.lock_state().set_frozen(frozen);
        tracing::debug!(action_id = %self.id(), frozen, "frozen flag changed");
    }

    pub fn set_ethernal(&self, ethernal: bool) {
        self.lock_state().set_ethernal(ethernal);
        tracing::debug!(action_id = %self.id(), ethernal, "ethernal flag changed");
    }

    /// See [`ActionState`] for the `add_ahead` rule
    pub fn set_total_duration(&self, total: Duration, add_ahead: bool) {
        self.lock_state().set_total_duration(total, add_ahead);
    }

    /// Whether the behavior is a `T`; safe from any hook
    pub fn is<T: Action>(&self) -> bool {
        self.cell.type_id == TypeId::of::<T>()
    }

    /// Full type name of the behavior
    pub fn type_name(&self) -> &'static str {
        self.cell.type_name
    }

    /// Borrow the behavior as a `T`
    ///
    /// `None` when the behavior is not a `T`, or when one of its hooks is
    /// running right now (including the caller's own hook).
    pub fn inspect<T: Action, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        if !self.is::<T>() {
            return None;
        }
        let guard = match self.cell.behavior.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        let behavior: &dyn Action = &**guard;
        AsAny::as_any(behavior).downcast_ref::<T>().map(f)
    }

    /// Both handles refer to the same action
    pub fn same(&self, other: &ActionHandle) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, ActionState> {
        self.cell.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn lock_behavior(&self) -> MutexGuard<'_, Box<dyn Action>> {
        self.cell.behavior.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn is_retiring(&self) -> bool {
        self.cell.retiring.load(Ordering::SeqCst)
    }

    /// Claim the termination sequence; false if already claimed
    pub(crate) fn begin_retire(&self) -> bool {
        self.cell
            .retiring
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

impl PartialEq for ActionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ActionHandle {}

impl fmt::Debug for ActionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandle")
            .field("id", &self.cell.id)
            .field("name", &self.cell.name)
            .field("group", &self.cell.group.name())
            .finish()
    }
}
