// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timing state machine of a single action
//!
//! Lifecycle: Constructed -> Active -> Archived. The state is guarded by the
//! action's own lock; the scheduler advances it once per tick.

use super::spec::ActionSpec;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Lifecycle phase of an action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Not yet admitted by a scheduler (or vetoed)
    Constructed,
    /// Registered and receiving updates
    Active,
    /// Terminal; hooks ran and a log entry was written
    Archived,
}

/// What a tick should do with an action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Frozen or not active: no hook call
    Skip,
    /// Call `on_update` with this elapsed time
    Update(Duration),
    /// Call `on_update` with the remaining time, then end the action
    Final(Duration),
}

/// Mutable timing fields and immutable policy flags of an action
#[derive(Clone, Debug, Serialize)]
pub struct ActionState {
    total_duration: Duration,
    remaining: Duration,
    ethernal: bool,
    frozen: bool,
    instant: bool,
    deniable: bool,
    reactable: bool,
    ended: bool,
    phase: Phase,
    #[serde(skip)]
    last_observed: Option<Instant>,
}

impl ActionState {
    pub(crate) fn from_spec(spec: &ActionSpec) -> Self {
        Self {
            total_duration: spec.duration(),
            remaining: spec.duration(),
            ethernal: spec.is_ethernal(),
            frozen: spec.is_frozen(),
            instant: spec.is_instant(),
            deniable: spec.is_deniable(),
            reactable: spec.is_reactable(),
            ended: false,
            phase: Phase::Constructed,
            last_observed: None,
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_ethernal(&self) -> bool {
        self.ethernal
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_instant(&self) -> bool {
        self.instant
    }

    pub fn is_deniable(&self) -> bool {
        self.deniable
    }

    pub fn is_reactable(&self) -> bool {
        self.reactable
    }

    /// Whether `on_end` has run
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn is_archived(&self) -> bool {
        self.phase == Phase::Archived
    }

    /// Admission: reset the remaining time and start observing the clock
    pub(crate) fn activate(&mut self, now: Instant) {
        self.remaining = self.total_duration;
        self.last_observed = Some(now);
        self.phase = Phase::Active;
    }

    /// Consume the time elapsed since the previous observation
    ///
    /// Frozen actions are re-stamped without consuming time, so the frozen
    /// span is never replayed after thawing.
    pub(crate) fn advance(&mut self, now: Instant) -> Step {
        if self.phase != Phase::Active || self.instant {
            return Step::Skip;
        }
        let last = self.last_observed.unwrap_or(now);
        // observed after `now` was read: wait for a later pass
        if now < last {
            return Step::Skip;
        }
        self.last_observed = Some(now);
        let elapsed = now - last;

        if self.frozen {
            return Step::Skip;
        }
        if self.ethernal {
            return Step::Update(elapsed);
        }
        if self.remaining <= elapsed {
            let left = self.remaining;
            self.remaining = Duration::ZERO;
            Step::Final(left)
        } else {
            self.remaining -= elapsed;
            Step::Update(elapsed)
        }
    }

    pub(crate) fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    pub(crate) fn set_ethernal(&mut self, ethernal: bool) {
        self.ethernal = ethernal;
    }

    /// Change the target length
    ///
    /// With `add_ahead` the remaining time moves by the same delta, clamped at
    /// zero; otherwise only the target changes.
    pub(crate) fn set_total_duration(&mut self, total: Duration, add_ahead: bool) {
        if add_ahead {
            self.remaining = if total >= self.total_duration {
                self.remaining.saturating_add(total - self.total_duration)
            } else {
                self.remaining
                    .saturating_sub(self.total_duration - total)
            };
        }
        self.total_duration = total;
        if self.phase == Phase::Constructed {
            self.remaining = total;
        }
    }

    pub(crate) fn mark_ended(&mut self) {
        self.ended = true;
    }

    pub(crate) fn archive(&mut self) {
        self.phase = Phase::Archived;
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
