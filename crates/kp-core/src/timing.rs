//! Opt-in stage timers.
//!
//! Off unless `enable_timing()` was called or `KP_TIMING` is set. Results go
//! to `tracing` at info level.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static FORCED: AtomicBool = AtomicBool::new(false);

pub fn enable_timing() {
    FORCED.store(true, Ordering::Relaxed);
}

pub fn disable_timing() {
    FORCED.store(false, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    FORCED.load(Ordering::Relaxed) || std::env::var_os("KP_TIMING").is_some()
}

/// Wall-clock timer for one pipeline stage.
pub struct Timer {
    stage: &'static str,
    started: Option<Instant>,
}

impl Timer {
    /// Starts measuring only when timing is enabled.
    pub fn start(stage: &'static str) -> Self {
        Self {
            stage,
            started: is_enabled().then(Instant::now),
        }
    }

    /// Seconds since `start`, or `None` when timing is off.
    pub fn stop(self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }

    pub fn stop_and_log(self) {
        let stage = self.stage;
        if let Some(elapsed_s) = self.stop() {
            tracing::info!(stage, elapsed_s, "stage finished");
        }
    }
}
