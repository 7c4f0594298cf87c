// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::Reaction;
use ranger_core::{Action, ActionContext, ActionHandle, ActionSpec, Group};
use std::time::Duration;

type Condition = Box<dyn FnMut() -> bool + Send>;

/// Polls a condition on every update until it holds
///
/// Ethernal: it stays active for as long as the condition is false. When the
/// condition holds it runs its reaction once and terminates itself.
pub struct Await {
    condition: Condition,
    group: Group,
    reaction: Option<Reaction>,
    polls: u64,
}

impl Await {
    pub fn until(condition: impl FnMut() -> bool + Send + 'static) -> Self {
        Self {
            condition: Box::new(condition),
            group: Group::ungrouped(),
            reaction: None,
            polls: 0,
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

    /// Number of times the condition was evaluated
    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn into_handle(self) -> ActionHandle {
        let spec = ActionSpec::ethernal().with_group(self.group.clone());
        ActionHandle::new(spec, self)
    }
}

impl Action for Await {
    fn on_update(&mut self, _elapsed: Duration, ctx: &mut ActionContext) {
        self.polls += 1;
        if !(self.condition)() {
            return;
        }
        if let Some(reaction) = self.reaction.take() {
            reaction(ctx);
        }
        ctx.terminate();
    }

    fn log_tags(&self) -> Vec<String> {
        vec!["await".to_string()]
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
