// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::Reaction;
use ranger_core::{Action, ActionContext, ActionHandle, ActionSpec, Group};
use std::time::Duration;

/// Runs a reaction when its duration runs out
///
/// The reaction runs on the natural end path only: ending the delay early
/// with `Scheduler::end` fires it, terminating it does not.
pub struct Delay {
    after: Duration,
    group: Group,
    reaction: Option<Reaction>,
}

impl Delay {
    pub fn new(after: Duration) -> Self {
        Self {
            after,
            group: Group::ungrouped(),
            reaction: None,
        }
    }

    pub fn then(mut self, reaction: impl FnOnce(&mut ActionContext) + Send + 'static) -> Self {
        self.reaction = Some(Box::new(reaction));
        self
    }

    pub fn in_group(mut self, group: Group) -> Self {
        self.group = group;
        self
    }

    pub fn after(&self) -> Duration {
        self.after
    }

    pub fn into_handle(self) -> ActionHandle {
        let spec = ActionSpec::timed(self.after).with_group(self.group.clone());
        ActionHandle::new(spec, self)
    }
}

impl Action for Delay {
    fn on_end(&mut self, ctx: &mut ActionContext) {
        if let Some(reaction) = self.reaction.take() {
            reaction(ctx);
        }
    }

    fn on_terminate(&mut self, ctx: &mut ActionContext) {
        if self.reaction.take().is_some() {
            tracing::debug!(action_id = %ctx.id(), "delay cancelled before firing");
        }
    }

    fn log_tags(&self) -> Vec<String> {
        vec!["delay".to_string()]
    }
}

#[cfg(test)]
#[path = "delay_tests.rs"]
mod tests;
