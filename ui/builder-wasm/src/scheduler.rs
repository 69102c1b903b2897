use dc_builder_core::{ScheduledTask, Scheduler};
use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;
use std::time::Duration;

/// Browser timers via `setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooScheduler;

impl Scheduler for GlooScheduler {
    fn schedule(&self, delay: Duration, task: LocalBoxFuture<'static, ()>) -> ScheduledTask {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let (handle, run) = ScheduledTask::deferred(TimeoutFuture::new(millis), task);
        wasm_bindgen_futures::spawn_local(run);
        handle
    }
}
