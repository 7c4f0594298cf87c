// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Construction-time description of an action

use crate::group::Group;
use std::time::Duration;

/// Timing flags, policy flags and group of an action
///
/// Built with one of the constructors and refined with `with_*` setters.
/// Inconsistent combinations are normalized: an instant action has no
/// duration and is never ethernal or frozen.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionSpec {
    duration: Duration,
    ethernal: bool,
    frozen: bool,
    instant: bool,
    deniable: bool,
    reactable: bool,
    group: Group,
}

impl ActionSpec {
    /// Runs for `duration`, then ends on its own
    pub fn timed(duration: Duration) -> Self {
        Self {
            duration,
            ethernal: false,
            frozen: false,
            instant: false,
            deniable: true,
            reactable: true,
            group: Group::ungrouped(),
        }
    }

    /// Runs until ended explicitly; duration never decreases
    pub fn ethernal() -> Self {
        Self::timed(Duration::ZERO).with_ethernal(true)
    }

    /// Admitted and ended within the same `submit`
    pub fn instant() -> Self {
        Self {
            instant: true,
            ..Self::timed(Duration::ZERO)
        }
    }

    /// Shape of background work: ethernal, not deniable, invisible to
    /// admission interceptors
    pub fn background() -> Self {
        Self::ethernal().with_deniable(false).with_reactable(false)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self.normalized()
    }

    pub fn with_ethernal(mut self, ethernal: bool) -> Self {
        self.ethernal = ethernal;
        self.normalized()
    }

    pub fn with_frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self.normalized()
    }

    pub fn with_deniable(mut self, deniable: bool) -> Self {
        self.deniable = deniable;
        self
    }

    pub fn with_reactable(mut self, reactable: bool) -> Self {
        self.reactable = reactable;
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.group = group;
        self
    }

    fn normalized(mut self) -> Self {
        if self.instant {
            self.duration = Duration::ZERO;
            self.ethernal = false;
            self.frozen = false;
        }
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
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

    pub fn group(&self) -> &Group {
        &self.group
    }
}

impl Default for ActionSpec {
    fn default() -> Self {
        Self::timed(Duration::ZERO)
    }
}
