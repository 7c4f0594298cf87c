// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instant announcement actions
//!
//! Both kinds end inside `submit`, so their only lasting trace is the
//! termination log: the entry carries the announcement name, and the payload
//! stays readable through `LogEntry::action().inspect`.

use ranger_core::{Action, ActionContext, ActionHandle, ActionSpec, Group, Modifiers};
use serde_json::{Map, Value};

/// Announces a named value
#[derive(Debug, Clone)]
pub struct Post {
    name: String,
    payload: Value,
    group: Group,
}

impl Post {
    pub fn new(name: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
            group: Group::ungrouped(),
        }
    }

    pub fn in_group(mut self, group: Group) -> Self {
        self.group = group;
        self
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_handle(self) -> ActionHandle {
        let spec = ActionSpec::instant().with_group(self.group.clone());
        ActionHandle::new(spec, self)
    }
}

impl Action for Post {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_message(&self) -> Option<String> {
        Some(format!("post {}: {}", self.name, self.payload))
    }

    fn log_tags(&self) -> Vec<String> {
        vec!["post".to_string(), format!("post:{}", self.name)]
    }
}

/// Announces a named event with a map of details
///
/// The details are offered to admission interceptors as modifiers, so a
/// ranger may rewrite them before the signal is recorded.
#[derive(Debug, Clone)]
pub struct Signal {
    name: String,
    details: Map<String, Value>,
    group: Group,
}

impl Signal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: Map::new(),
            group: Group::ungrouped(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details.extend(details);
        self
    }

    pub fn in_group(mut self, group: Group) -> Self {
        self.group = group;
        self
    }

    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    pub fn into_handle(self) -> ActionHandle {
        let spec = ActionSpec::instant().with_group(self.group.clone());
        ActionHandle::new(spec, self)
    }
}

impl Action for Signal {
    fn name(&self) -> &str {
        &self.name
    }

    fn modifiers(&self) -> Modifiers {
        self.details
            .iter()
            .fold(Modifiers::new(), |m, (k, v)| m.with(k.clone(), v.clone()))
    }

    fn modify(&mut self, modifiers: &Modifiers) {
        self.details = modifiers
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
    }

    fn on_start(&mut self, ctx: &mut ActionContext) {
        tracing::debug!(
            action_id = %ctx.id(),
            signal = %self.name,
            details = self.details.len(),
            "signal raised"
        );
    }

    fn log_tags(&self) -> Vec<String> {
        vec!["signal".to_string(), format!("signal:{}", self.name)]
    }
}

#[cfg(test)]
#[path = "post_tests.rs"]
mod tests;
