//! Fixed-cadence tap session loop.
//!
//! One tick per tap at the configured rate, with a live estimate echoed once
//! a second. Stopping (Ctrl-C or a limit) cancels future ticks but never
//! interrupts a tick in progress.

use std::time::{Duration, Instant};

use tokio::time::{self, MissedTickBehavior};

use tt_core::Estimator;

/// Outcome of a completed session loop.
#[derive(Debug, Clone, Copy)]
pub struct SessionSummary {
    pub taps: i64,
    pub elapsed_secs: u64,
    pub estimated_likes: i64,
}

/// Stop conditions. Either bound being reached ends the loop; with neither
/// set the loop runs until Ctrl-C.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionLimits {
    pub max_seconds: Option<u64>,
    pub max_taps: Option<u64>,
}

impl SessionLimits {
    /// True once the session should dispatch no further taps.
    pub fn reached(&self, taps: u64, elapsed: Duration) -> bool {
        if let Some(max) = self.max_taps
            && taps >= max
        {
            return true;
        }
        if let Some(max) = self.max_seconds
            && elapsed.as_secs() >= max
        {
            return true;
        }
        false
    }
}

pub async fn run(estimator: &Estimator, rate: i64, limits: SessionLimits) -> SessionSummary {
    let period = Duration::from_millis(1000 / rate.max(1) as u64);
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let started = Instant::now();
    let mut taps: u64 = 0;
    let mut last_echo_secs = 0u64;

    loop {
        if limits.reached(taps, started.elapsed()) {
            break;
        }

        tokio::select! {
            _ = interval.tick() => {
                taps += 1;
                let secs = started.elapsed().as_secs();
                if secs > last_echo_secs {
                    last_echo_secs = secs;
                    let likes = estimator.likes_from_taps(taps as i64);
                    println!("taps: {taps}  est likes: {likes}");
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("stop requested");
                break;
            }
        }
    }

    SessionSummary {
        taps: taps as i64,
        elapsed_secs: started.elapsed().as_secs(),
        estimated_likes: estimator.likes_from_taps(taps as i64),
    }
}
