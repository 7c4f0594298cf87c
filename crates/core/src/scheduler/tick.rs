// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One update pass over the active registry

use super::lifecycle::Finish;
use super::Scheduler;
use crate::action::{ActionContext, Effects, Step};
use crate::archive::EndReason;
use crate::clock::Clock;
use crate::unwind::contain;

/// What a single tick did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// `on_update` calls made
    pub updated: usize,
    /// Actions whose duration ran out and were terminated
    pub expired: usize,
    /// Registry entries removed at the end of the pass
    pub purged: usize,
}

impl<C: Clock> Scheduler<C> {
    /// Advance every active action by the clock time since it was last seen
    ///
    /// The pass works on a snapshot of the registry, so hooks may request new
    /// admissions or terminations freely; those take effect after the pass.
    /// Actions whose duration ran out receive a final update with exactly the
    /// remaining time, then terminate once the pass is over.
    pub fn tick(&self) -> TickSummary {
        let inner = &self.inner;
        let snapshot = inner.snapshot();
        let now = inner.clock.now();
        let mut effects = Effects::new();
        let mut expiring = Vec::new();
        let mut summary = TickSummary::default();

        for action in snapshot {
            if action.is_retiring() {
                continue;
            }
            let step = action.lock_state().advance(now);
            let elapsed = match step {
                Step::Skip => continue,
                Step::Update(elapsed) => elapsed,
                Step::Final(elapsed) => {
                    expiring.push(action.clone());
                    elapsed
                }
            };

            let mut behavior = action.lock_behavior();
            // terminated by another thread while this pass was running
            if action.is_retiring() {
                continue;
            }
            let mut ctx = ActionContext::new(action.clone());
            if let Err(message) = contain(|| behavior.on_update(elapsed, &mut ctx)) {
                tracing::error!(action_id = %action.id(), panic = %message, "on_update panicked");
                ctx.terminate();
            }
            effects.extend(ctx.into_effects());
            summary.updated += 1;
        }

        {
            let _seq = inner.lock_sequencer();
            for action in &expiring {
                if inner.finish_locked(action, Finish::Natural, EndReason::Expired, &mut effects) {
                    summary.expired += 1;
                }
            }
            summary.purged = inner.purge();
        }

        tracing::trace!(
            updated = summary.updated,
            expired = summary.expired,
            purged = summary.purged,
            "tick"
        );
        inner.apply(effects);
        summary
    }
}

#[cfg(test)]
#[path = "tick_tests.rs"]
mod tests;
