// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Termination chain ("end rangers")

use super::{InterceptorError, InterceptorHandle, InterceptorSet, Registration, ScopeFn};
use crate::action::{ActionHandle, Effects};
use crate::id::InterceptorId;
use crate::order::{PriorityKey, Prioritized};
use crate::unwind::contain;
use std::ops::ControlFlow;

/// Reaction to a terminated action; follow-up work goes into the effects sink
pub type ReactFn = dyn Fn(&ActionHandle, &mut Effects) + Send + Sync;

/// A registered termination interceptor
pub struct EndRanger {
    name: String,
    key: PriorityKey,
    scope: Box<ScopeFn>,
    react: Box<ReactFn>,
}

impl EndRanger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> InterceptorId {
        self.key.id()
    }

    pub fn priority(&self) -> f64 {
        self.key.priority()
    }
}

impl Prioritized for EndRanger {
    fn key(&self) -> PriorityKey {
        self.key
    }
}

/// Outcome of notifying the chain about one termination
#[derive(Debug, Default)]
pub struct Notified {
    /// Reactions whose scope matched
    pub invoked: usize,
    /// Reactions (or scopes) that panicked; their effects are discarded
    pub failed: usize,
    /// Effects requested by the reactions that completed
    pub effects: Effects,
}

/// Priority-ordered termination interceptors, scoped per group
pub struct TerminationChain {
    reactions: InterceptorSet<EndRanger>,
}

impl TerminationChain {
    pub fn new() -> Self {
        Self {
            reactions: InterceptorSet::new(),
        }
    }

    pub fn register(
        &self,
        registration: Registration,
        scope: impl Fn(&ActionHandle) -> bool + Send + Sync + 'static,
        react: impl Fn(&ActionHandle, &mut Effects) + Send + Sync + 'static,
    ) -> Result<InterceptorHandle, InterceptorError> {
        let key = self.reactions.next_key(registration.priority)?;
        let reaction = EndRanger {
            name: registration.name,
            key,
            scope: Box::new(scope),
            react: Box::new(react),
        };
        tracing::debug!(
            interceptor = %key.id(),
            name = %reaction.name,
            priority = key.priority(),
            group = %registration.group,
            "end ranger registered"
        );
        Ok(self.reactions.insert(registration.group, reaction))
    }

    pub fn remove(&self, handle: &InterceptorHandle) -> bool {
        let removed = self.reactions.remove(handle);
        if removed {
            tracing::debug!(interceptor = %handle.id(), "end ranger removed");
        }
        removed
    }

    /// Run every applicable reaction in priority order
    ///
    /// Never short-circuits: a panicking reaction is logged and the walk
    /// continues with the next one.
    pub fn notify(&self, action: &ActionHandle) -> Notified {
        let mut notified = Notified::default();
        let _ = self.reactions.walk(action.group(), |reaction| {
            let mut local = Effects::new();
            let outcome = contain(|| {
                if (reaction.scope)(action) {
                    (reaction.react)(action, &mut local);
                    true
                } else {
                    false
                }
            });
            match outcome {
                Ok(true) => {
                    notified.invoked += 1;
                    notified.effects.extend(local);
                }
                Ok(false) => {}
                Err(message) => {
                    notified.invoked += 1;
                    notified.failed += 1;
                    tracing::error!(
                        action_id = %action.id(),
                        interceptor = %reaction.id(),
                        name = %reaction.name,
                        panic = %message,
                        "end ranger panicked"
                    );
                }
            }
            ControlFlow::<()>::Continue(())
        });
        notified
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TerminationChain {
    fn default() -> Self {
        Self::new()
    }
}
