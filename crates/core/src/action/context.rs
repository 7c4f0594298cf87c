// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred requests issued from hooks and interceptor reactions
//!
//! Hooks run while scheduler locks are held, so they never call the scheduler
//! directly. They record [`Effect`]s instead; the scheduler applies them in
//! order once the triggering sequence has released its locks.

use super::handle::ActionHandle;
use super::spec::ActionSpec;
use super::trigger::TriggerCode;
use super::Action;
use crate::id::ActionId;

/// A request for the scheduler, applied after the current sequence
#[derive(Clone, Debug)]
pub enum Effect {
    /// Submit an action for admission
    Submit(ActionHandle),
    /// End an action through its natural `on_end` path
    End(ActionHandle),
    /// Force-terminate an action (`on_terminate` path)
    Terminate(ActionHandle),
    /// Deliver a trigger code
    Trigger(ActionHandle, TriggerCode),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Submit(_) => "submit",
            Effect::End(_) => "end",
            Effect::Terminate(_) => "terminate",
            Effect::Trigger(..) => "trigger",
        }
    }

    pub fn target(&self) -> &ActionHandle {
        match self {
            Effect::Submit(a) | Effect::End(a) | Effect::Terminate(a) | Effect::Trigger(a, _) => a,
        }
    }
}

/// Ordered collection of pending effects
#[derive(Clone, Debug, Default)]
pub struct Effects {
    queue: Vec<Effect>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.queue.push(effect);
    }

    /// Construct and submit a new action; returns its handle
    pub fn start(&mut self, spec: ActionSpec, action: impl Action) -> ActionHandle {
        let handle = ActionHandle::new(spec, action);
        self.submit(handle.clone());
        handle
    }

    pub fn submit(&mut self, action: ActionHandle) {
        self.push(Effect::Submit(action));
    }

    pub fn end(&mut self, action: &ActionHandle) {
        self.push(Effect::End(action.clone()));
    }

    pub fn terminate(&mut self, action: &ActionHandle) {
        self.push(Effect::Terminate(action.clone()));
    }

    pub fn trigger(&mut self, action: &ActionHandle, code: TriggerCode) {
        self.push(Effect::Trigger(action.clone(), code));
    }

    pub fn extend(&mut self, other: Effects) {
        self.queue.extend(other.queue);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Effect> {
        self.queue.iter()
    }
}

impl IntoIterator for Effects {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.queue.into_iter()
    }
}

/// Handed to every hook of an action
pub struct ActionContext {
    action: ActionHandle,
    effects: Effects,
}

impl ActionContext {
    pub(crate) fn new(action: ActionHandle) -> Self {
        Self {
            action,
            effects: Effects::new(),
        }
    }

    /// The action whose hook is running
    pub fn action(&self) -> &ActionHandle {
        &self.action
    }

    pub fn id(&self) -> ActionId {
        self.action.id()
    }

    /// End this action through `on_end` once the hook returns
    pub fn end(&mut self) {
        let me = self.action.clone();
        self.effects.end(&me);
    }

    /// Force-terminate this action once the hook returns
    pub fn terminate(&mut self) {
        let me = self.action.clone();
        self.effects.terminate(&me);
    }

    pub fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    pub(crate) fn into_effects(self) -> Effects {
        self.effects
    }
}
