// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for scheduler tests

use crate::action::{Action, ActionContext, ActionHandle, ActionSpec, TriggerCode};
use crate::clock::FakeClock;
use crate::config::SchedulerConfig;
use crate::modifiers::Modifiers;
use crate::scheduler::Scheduler;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

pub(crate) fn fixture() -> Scheduler<FakeClock> {
    Scheduler::with_clock(SchedulerConfig::default(), FakeClock::new())
}

pub(crate) fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

/// Hook invocations recorded by [`Recorder`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Modify(Modifiers),
    Start,
    Update(Duration),
    End,
    Terminate,
    Trigger(TriggerCode),
}

#[derive(Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<Call>>>);

impl Journal {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn updates(&self) -> Vec<Duration> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }
}

type UpdateFn = Box<dyn FnMut(Duration, &mut ActionContext) + Send>;

/// Action that records every hook call
pub(crate) struct Recorder {
    journal: Journal,
    offered: Modifiers,
    tags: Vec<String>,
    on_update: Option<UpdateFn>,
}

impl Recorder {
    pub(crate) fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            offered: Modifiers::new(),
            tags: Vec::new(),
            on_update: None,
        }
    }

    pub(crate) fn offering(mut self, modifiers: Modifiers) -> Self {
        self.offered = modifiers;
        self
    }

    pub(crate) fn tagged(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub(crate) fn updating(
        mut self,
        f: impl FnMut(Duration, &mut ActionContext) + Send + 'static,
    ) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub(crate) fn with(self, spec: ActionSpec) -> ActionHandle {
        ActionHandle::new(spec, self)
    }
}

impl Action for Recorder {
    fn modifiers(&self) -> Modifiers {
        self.offered.clone()
    }

    fn modify(&mut self, modifiers: &Modifiers) {
        self.journal.push(Call::Modify(modifiers.clone()));
    }

    fn on_start(&mut self, _ctx: &mut ActionContext) {
        self.journal.push(Call::Start);
    }

    fn on_update(&mut self, elapsed: Duration, ctx: &mut ActionContext) {
        self.journal.push(Call::Update(elapsed));
        if let Some(f) = self.on_update.as_mut() {
            f(elapsed, ctx);
        }
    }

    fn on_end(&mut self, _ctx: &mut ActionContext) {
        self.journal.push(Call::End);
    }

    fn on_terminate(&mut self, _ctx: &mut ActionContext) {
        self.journal.push(Call::Terminate);
    }

    fn on_trigger(&mut self, code: TriggerCode, ctx: &mut ActionContext) {
        self.journal.push(Call::Trigger(code));
        if code == TriggerCode::TerminateNow {
            ctx.terminate();
        }
    }

    fn start_message(&self) -> Option<String> {
        Some("recorder started".to_string())
    }

    fn log_tags(&self) -> Vec<String> {
        self.tags.clone()
    }
}

/// A writer that captures log output for testing
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with tracing output of the current thread captured
pub(crate) fn with_tracing<R>(f: impl FnOnce() -> R) -> (String, R) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (logs.contents(), result)
}
