// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Codes delivered to `Action::on_trigger`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason an external party pokes an active action
///
/// Only `TerminateNow` has default handling (forced termination); the rest
/// are no-ops unless the action overrides `on_trigger`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCode {
    /// The entity that caused the action is gone
    SourceRemoved,
    /// Another effect forbids this action from continuing
    BlockedByEffect,
    /// The action is probably redundant now
    NowIrrelevant,
    /// The source aborted the action
    CancelledBySource,
    /// End the action immediately, running its termination hooks
    TerminateNow,
}

impl TriggerCode {
    pub const ALL: [TriggerCode; 5] = [
        TriggerCode::SourceRemoved,
        TriggerCode::BlockedByEffect,
        TriggerCode::NowIrrelevant,
        TriggerCode::CancelledBySource,
        TriggerCode::TerminateNow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerCode::SourceRemoved => "source_removed",
            TriggerCode::BlockedByEffect => "blocked_by_effect",
            TriggerCode::NowIrrelevant => "now_irrelevant",
            TriggerCode::CancelledBySource => "cancelled_by_source",
            TriggerCode::TerminateNow => "terminate_now",
        }
    }
}

impl fmt::Display for TriggerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
