// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission chain ("rangers")

use super::{InterceptorError, InterceptorHandle, InterceptorSet, Registration, ScopeFn};
use crate::action::ActionHandle;
use crate::id::InterceptorId;
use crate::modifiers::Modifiers;
use crate::order::{PriorityKey, Prioritized};
use std::ops::ControlFlow;

/// Decision of a single ranger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Veto,
}

/// Decision function: may rewrite the modifiers, then allows or vetoes
pub type DecideFn = dyn Fn(&ActionHandle, &mut Modifiers) -> Verdict + Send + Sync;

/// A registered admission interceptor
pub struct Ranger {
    name: String,
    key: PriorityKey,
    scope: Box<ScopeFn>,
    decide: Box<DecideFn>,
}

impl Ranger {
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

impl Prioritized for Ranger {
    fn key(&self) -> PriorityKey {
        self.key
    }
}

/// Result of walking the chain for one action
#[derive(Clone, Debug, PartialEq)]
pub struct Admission {
    /// The ranger that stopped the walk, if any
    pub vetoed_by: Option<InterceptorId>,
    /// Modifiers after every consulted ranger ran
    pub modifiers: Modifiers,
}

impl Admission {
    pub fn is_vetoed(&self) -> bool {
        self.vetoed_by.is_some()
    }
}

/// Priority-ordered admission interceptors, scoped per group
pub struct AdmissionChain {
    rangers: InterceptorSet<Ranger>,
}

impl AdmissionChain {
    pub fn new() -> Self {
        Self {
            rangers: InterceptorSet::new(),
        }
    }

    pub fn register(
        &self,
        registration: Registration,
        scope: impl Fn(&ActionHandle) -> bool + Send + Sync + 'static,
        decide: impl Fn(&ActionHandle, &mut Modifiers) -> Verdict + Send + Sync + 'static,
    ) -> Result<InterceptorHandle, InterceptorError> {
        let key = self.rangers.next_key(registration.priority)?;
        let ranger = Ranger {
            name: registration.name,
            key,
            scope: Box::new(scope),
            decide: Box::new(decide),
        };
        tracing::debug!(
            interceptor = %key.id(),
            name = %ranger.name,
            priority = key.priority(),
            group = %registration.group,
            "ranger registered"
        );
        Ok(self.rangers.insert(registration.group, ranger))
    }

    /// Remove a ranger; walks already in progress are unaffected
    pub fn remove(&self, handle: &InterceptorHandle) -> bool {
        let removed = self.rangers.remove(handle);
        if removed {
            tracing::debug!(interceptor = %handle.id(), "ranger removed");
        }
        removed
    }

    /// Walk the rangers applicable to `action` and stop at the first veto
    pub fn evaluate(&self, action: &ActionHandle, mut modifiers: Modifiers) -> Admission {
        let walk = self.rangers.walk(action.group(), |ranger| {
            if !(ranger.scope)(action) {
                return ControlFlow::Continue(());
            }
            match (ranger.decide)(action, &mut modifiers) {
                Verdict::Allow => ControlFlow::Continue(()),
                Verdict::Veto => {
                    tracing::debug!(
                        action_id = %action.id(),
                        interceptor = %ranger.id(),
                        name = %ranger.name,
                        "ranger vetoed admission"
                    );
                    ControlFlow::Break(ranger.id())
                }
            }
        });
        let vetoed_by = match walk {
            ControlFlow::Break(id) => Some(id),
            ControlFlow::Continue(()) => None,
        };
        Admission {
            vetoed_by,
            modifiers,
        }
    }

    pub fn len(&self) -> usize {
        self.rangers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AdmissionChain {
    fn default() -> Self {
        Self::new()
    }
}
