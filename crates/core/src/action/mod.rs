// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The action contract
//!
//! An action is a unit of timed behavior: it fires once after a delay, runs a
//! continuous effect for a bounded or unbounded time, or wraps background
//! work. Callers implement [`Action`] for the behavior and describe timing
//! with an [`ActionSpec`]; the scheduler owns the lifecycle and calls the
//! hooks.

mod context;
mod handle;
mod spec;
mod state;
mod trigger;

pub use context::{ActionContext, Effect, Effects};
pub use handle::ActionHandle;
pub use spec::ActionSpec;
pub use state::{ActionState, Phase, Step};
pub use trigger::TriggerCode;

use crate::modifiers::Modifiers;
use std::any::Any;
use std::time::Duration;

/// Dynamic downcasting support for action behaviors
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Lifecycle hooks of an action
///
/// Only the scheduler calls these. Each hook receives an [`ActionContext`]
/// for requesting follow-up work.
pub trait Action: AsAny + Send {
    /// Display name used in logs; defaults to the bare type name
    fn name(&self) -> &str {
        short_type_name(self.type_name())
    }

    /// Start-time configuration offered to admission interceptors
    fn modifiers(&self) -> Modifiers {
        Modifiers::default()
    }

    /// Apply the configuration that survived admission
    fn modify(&mut self, _modifiers: &Modifiers) {}

    /// Once, at admission, before any update
    fn on_start(&mut self, _ctx: &mut ActionContext) {}

    /// Each tick while active and not frozen
    fn on_update(&mut self, _elapsed: Duration, _ctx: &mut ActionContext) {}

    /// Natural end: duration ran out or the action was ended explicitly
    fn on_end(&mut self, _ctx: &mut ActionContext) {}

    /// Forced end; skipped when `on_end` already ran
    fn on_terminate(&mut self, _ctx: &mut ActionContext) {}

    fn on_trigger(&mut self, code: TriggerCode, ctx: &mut ActionContext) {
        if code == TriggerCode::TerminateNow {
            ctx.terminate();
        }
    }

    /// Logged at debug level on admission when present
    fn start_message(&self) -> Option<String> {
        None
    }

    /// Logged at debug level on termination when present
    fn end_message(&self) -> Option<String> {
        None
    }

    /// Free-form tags recorded in the termination log
    fn log_tags(&self) -> Vec<String> {
        Vec::new()
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
