//! Shared fixtures for the behavioral specs

pub use ranger_core::{
    Action, ActionContext, ActionHandle, ActionSpec, EndReason, FakeClock, Modifiers,
    Registration, Scheduler, SchedulerConfig, SchedulerError, TriggerCode, Verdict,
};
pub use similar_asserts::assert_eq;
pub use std::sync::{Arc, Mutex};
pub use std::time::Duration;

/// A scheduler on a manually advanced clock
pub fn scheduler() -> Scheduler<FakeClock> {
    Scheduler::with_clock(SchedulerConfig::default(), FakeClock::new())
}

pub fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

/// Advance the clock by `step` and run one pass
pub fn tick_by(scheduler: &Scheduler<FakeClock>, step: Duration) {
    scheduler.clock().advance(step);
    scheduler.tick();
}

/// Hook invocations observed by a [`Probe`]
#[derive(Debug, Clone, PartialEq)]
pub enum Hook {
    Start,
    Update(Duration),
    End,
    Terminate,
}

/// Thread-safe record of hook invocations
#[derive(Clone, Default)]
pub struct Hooks(Arc<Mutex<Vec<Hook>>>);

impl Hooks {
    pub fn all(&self) -> Vec<Hook> {
        self.0.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<Duration> {
        self.all()
            .into_iter()
            .filter_map(|h| match h {
                Hook::Update(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, hook: &Hook) -> usize {
        self.all().iter().filter(|h| *h == hook).count()
    }

    fn push(&self, hook: Hook) {
        self.0.lock().unwrap().push(hook);
    }
}

/// An action that records every hook call into shared [`Hooks`]
pub struct Probe(pub Hooks);

impl Action for Probe {
    fn on_start(&mut self, _ctx: &mut ActionContext) {
        self.0.push(Hook::Start);
    }

    fn on_update(&mut self, elapsed: Duration, _ctx: &mut ActionContext) {
        self.0.push(Hook::Update(elapsed));
    }

    fn on_end(&mut self, _ctx: &mut ActionContext) {
        self.0.push(Hook::End);
    }

    fn on_terminate(&mut self, _ctx: &mut ActionContext) {
        self.0.push(Hook::Terminate);
    }
}

pub fn probe(spec: ActionSpec) -> (ActionHandle, Hooks) {
    let hooks = Hooks::default();
    (ActionHandle::new(spec, Probe(hooks.clone())), hooks)
}
