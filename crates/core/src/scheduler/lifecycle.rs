// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission, termination and deferred effect application

use super::{Inner, Scheduler};
use crate::action::{ActionContext, ActionHandle, Effect, Effects, Phase, TriggerCode};
use crate::archive::EndReason;
use crate::clock::Clock;
use crate::error::SchedulerError;
use crate::unwind::contain;
use std::collections::VecDeque;

/// Which hook a termination sequence runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Finish {
    /// `on_end` unless it already ran
    Natural,
    /// `on_terminate` unless `on_end` already ran
    Forced,
}

impl<C: Clock> Scheduler<C> {
    /// Offer an action for admission
    ///
    /// Returns `Ok(false)` when a ranger vetoes a deniable action. Instant
    /// actions run their whole lifecycle before this returns.
    pub fn submit(&self, action: &ActionHandle) -> Result<bool, SchedulerError> {
        let mut effects = Effects::new();
        let admitted = {
            let _seq = self.inner.lock_sequencer();
            self.inner.admit(action, &mut effects)?
        };
        self.inner.apply(effects);
        Ok(admitted)
    }

    /// End an action through its natural `on_end` path
    ///
    /// `Ok(false)` when the action already terminated.
    pub fn end(&self, action: &ActionHandle) -> Result<bool, SchedulerError> {
        self.finish(action, Finish::Natural, EndReason::Ended)
    }

    /// Force-terminate an action (`on_terminate` path)
    ///
    /// `Ok(false)` when the action already terminated.
    pub fn terminate(&self, action: &ActionHandle) -> Result<bool, SchedulerError> {
        self.finish(action, Finish::Forced, EndReason::Terminated)
    }

    /// Deliver a trigger code to an active action
    ///
    /// `Ok(false)` when the action already terminated.
    pub fn trigger(&self, action: &ActionHandle, code: TriggerCode) -> Result<bool, SchedulerError> {
        let mut effects = Effects::new();
        let delivered = {
            let _seq = self.inner.lock_sequencer();
            self.inner.deliver(action, code, &mut effects)?
        };
        self.inner.apply(effects);
        Ok(delivered)
    }

    fn finish(
        &self,
        action: &ActionHandle,
        finish: Finish,
        reason: EndReason,
    ) -> Result<bool, SchedulerError> {
        let mut effects = Effects::new();
        let finished = {
            let _seq = self.inner.lock_sequencer();
            self.inner.finish_admitted(action, finish, reason, &mut effects)?
        };
        self.inner.apply(effects);
        Ok(finished)
    }
}

/// Run one hook with a fresh context, containing panics
fn run_hook(
    action: &ActionHandle,
    hook: &'static str,
    f: impl FnOnce(&mut ActionContext),
) -> Effects {
    let mut ctx = ActionContext::new(action.clone());
    if let Err(message) = contain(|| f(&mut ctx)) {
        tracing::error!(action_id = %action.id(), hook, panic = %message, "action hook panicked");
    }
    ctx.into_effects()
}

impl<C: Clock> Inner<C> {
    /// Admission sequence; caller holds the sequencer
    pub(super) fn admit(
        &self,
        action: &ActionHandle,
        effects: &mut Effects,
    ) -> Result<bool, SchedulerError> {
        if self.is_closed() {
            tracing::error!(action_id = %action.id(), "submit after shutdown");
            return Err(SchedulerError::ShutDown);
        }
        let (phase, deniable, reactable) = {
            let state = action.lock_state();
            (state.phase(), state.is_deniable(), state.is_reactable())
        };
        match phase {
            Phase::Active if !action.is_retiring() => {
                tracing::error!(action_id = %action.id(), "action submitted twice");
                return Err(SchedulerError::AlreadyRegistered(action.id()));
            }
            Phase::Active | Phase::Archived => {
                tracing::error!(action_id = %action.id(), "archived action submitted");
                return Err(SchedulerError::AlreadyArchived(action.id()));
            }
            Phase::Constructed => {}
        }

        let offered = action.lock_behavior().modifiers();
        let modifiers = if reactable {
            let admission = self.admission.evaluate(action, offered);
            if let Some(ranger) = admission.vetoed_by {
                if deniable {
                    tracing::warn!(
                        action_id = %action.id(),
                        name = action.name(),
                        interceptor = %ranger,
                        "admission vetoed"
                    );
                    return Ok(false);
                }
                tracing::debug!(
                    action_id = %action.id(),
                    interceptor = %ranger,
                    "veto ignored for non-deniable action"
                );
            }
            admission.modifiers
        } else {
            offered
        };

        let instant = {
            let mut behavior = action.lock_behavior();
            behavior.modify(&modifiers);
            let instant = {
                let mut state = action.lock_state();
                state.activate(self.clock.now());
                state.is_instant()
            };
            if !instant {
                self.lock_registry().push(action.clone());
            }
            tracing::debug!(
                action_id = %action.id(),
                name = action.name(),
                group = %action.group(),
                "action admitted"
            );
            if let Some(message) = behavior.start_message() {
                tracing::debug!(action_id = %action.id(), "{message}");
            }
            effects.extend(run_hook(action, "on_start", |ctx| behavior.on_start(ctx)));
            instant
        };

        if instant {
            self.finish_locked(action, Finish::Natural, EndReason::Ended, effects);
        }
        Ok(true)
    }

    /// Termination sequence for an action that must have been admitted
    pub(super) fn finish_admitted(
        &self,
        action: &ActionHandle,
        finish: Finish,
        reason: EndReason,
        effects: &mut Effects,
    ) -> Result<bool, SchedulerError> {
        if !action.is_retiring() && action.lock_state().phase() == Phase::Constructed {
            tracing::error!(action_id = %action.id(), %reason, "ending an action that was never admitted");
            return Err(SchedulerError::NotAdmitted(action.id()));
        }
        Ok(self.finish_locked(action, finish, reason, effects))
    }

    /// Termination sequence; caller holds the sequencer
    ///
    /// Runs at most once per action: hooks, termination chain, archive, log
    /// entry. Registry removal is left to the next purge.
    pub(super) fn finish_locked(
        &self,
        action: &ActionHandle,
        finish: Finish,
        reason: EndReason,
        effects: &mut Effects,
    ) -> bool {
        if !action.begin_retire() {
            return false;
        }

        let tags = {
            let mut behavior = action.lock_behavior();
            let ended = action.lock_state().has_ended();
            if !ended {
                let hook_effects = match finish {
                    Finish::Natural => run_hook(action, "on_end", |ctx| behavior.on_end(ctx)),
                    Finish::Forced => {
                        run_hook(action, "on_terminate", |ctx| behavior.on_terminate(ctx))
                    }
                };
                action.lock_state().mark_ended();
                effects.extend(hook_effects);
            }
            if let Some(message) = behavior.end_message() {
                tracing::debug!(action_id = %action.id(), "{message}");
            }
            behavior.log_tags()
        };

        let notified = self.termination.notify(action);
        effects.extend(notified.effects);

        action.lock_state().archive();
        let entry = self.log.append(action, self.clock.since(self.epoch), reason, tags);
        tracing::debug!(
            action_id = %action.id(),
            name = action.name(),
            %reason,
            sequence = entry.sequence,
            end_rangers = notified.invoked,
            "action archived"
        );
        true
    }

    /// Trigger delivery; caller holds the sequencer
    pub(super) fn deliver(
        &self,
        action: &ActionHandle,
        code: TriggerCode,
        effects: &mut Effects,
    ) -> Result<bool, SchedulerError> {
        if action.is_retiring() {
            return Ok(false);
        }
        if action.lock_state().phase() == Phase::Constructed {
            tracing::error!(action_id = %action.id(), %code, "trigger for an action that was never admitted");
            return Err(SchedulerError::NotAdmitted(action.id()));
        }
        tracing::debug!(action_id = %action.id(), %code, "trigger delivered");
        let mut behavior = action.lock_behavior();
        effects.extend(run_hook(action, "on_trigger", |ctx| behavior.on_trigger(code, ctx)));
        Ok(true)
    }

    /// Drop retired actions from the registry; caller holds the sequencer
    pub(super) fn purge(&self) -> usize {
        let mut registry = self.lock_registry();
        let before = registry.len();
        registry.retain(|a| !a.is_retiring());
        before - registry.len()
    }

    /// Apply deferred effects in FIFO order, including the ones they produce
    pub(super) fn apply(&self, effects: Effects) {
        let mut pending: VecDeque<Effect> = effects.into_iter().collect();
        let mut applied = 0usize;

        while let Some(effect) = pending.pop_front() {
            if self.is_closed() {
                tracing::debug!(discarded = pending.len() + 1, "discarding effects after shutdown");
                return;
            }
            if applied >= self.config.effect_budget {
                tracing::error!(
                    dropped = pending.len() + 1,
                    budget = self.config.effect_budget,
                    "effect budget exhausted"
                );
                return;
            }
            applied += 1;

            let mut produced = Effects::new();
            let result = {
                let _seq = self.lock_sequencer();
                match &effect {
                    Effect::Submit(a) => self.admit(a, &mut produced),
                    Effect::End(a) => {
                        self.finish_admitted(a, Finish::Natural, EndReason::Ended, &mut produced)
                    }
                    Effect::Terminate(a) => self.finish_admitted(
                        a,
                        Finish::Forced,
                        EndReason::Terminated,
                        &mut produced,
                    ),
                    Effect::Trigger(a, code) => self.deliver(a, *code, &mut produced),
                }
            };
            if let Err(e) = result {
                tracing::warn!(
                    effect = effect.name(),
                    action_id = %effect.target().id(),
                    error = %e,
                    "deferred effect failed"
                );
            }
            pending.extend(produced);
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
