//! Idle-activity watchdog.
//!
//! Runs on its own thread so idle time keeps being measured even while the
//! owner thread is busy rendering. It never touches shared application
//! state: advisory [`IdleEvent`]s go out through an unbounded
//! `std::sync::mpsc` channel that the owner thread drains at its own
//! cadence.
//!
//! A mild nudge fires once per idle stretch without resetting the idle
//! clock; a severe nudge adds a strike and resets the clock so it does not
//! re-fire on every poll. The asymmetry is intentional.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Severity of an idle nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleLevel {
    Mild,
    Severe,
}

/// Advisory nudge. Produced by the watchdog thread, consumed once by the
/// presentation layer, discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleEvent {
    pub level: IdleLevel,
    pub message: String,
    pub timestamp: chrono::DateTime<Utc>,
}

/// Poll cadence and nudge thresholds.
///
/// Defaults are the production values; tests shrink them to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogConfig {
    pub poll_interval: Duration,
    pub mild_after: Duration,
    pub severe_after: Duration,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            mild_after: Duration::from_secs(60),
            severe_after: Duration::from_secs(120),
        }
    }
}

struct WatchState {
    last_interaction: Instant,
    strikes: u32,
    mild_fired: bool,
    stopped: bool,
}

struct Shared {
    state: Mutex<WatchState>,
    wake: Condvar,
}

/// Handle to a running watchdog thread.
///
/// Dropping the handle stops the thread;
/// [`stop_monitoring`](Self::stop_monitoring) does so explicitly and is
/// idempotent. No event is delivered after it returns.
pub struct IdleWatchdog {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl IdleWatchdog {
    /// Start monitoring. The idle clock starts at zero.
    pub fn spawn(config: WatchdogConfig, events: Sender<IdleEvent>) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(WatchState {
                last_interaction: Instant::now(),
                strikes: 0,
                mild_fired: false,
                stopped: false,
            }),
            wake: Condvar::new(),
        });

        let thread_shared = Arc::clone(&shared);
        let handle = std::thread::spawn(move || poll_loop(thread_shared, config, events));

        Self {
            shared,
            handle: Some(handle),
        }
    }

    /// Record user activity: resets the idle clock, clears strikes and
    /// the pending mild nudge.
    pub fn register_interaction(&self) {
        let mut state = lock(&self.shared.state);
        state.last_interaction = Instant::now();
        state.strikes = 0;
        state.mild_fired = false;
    }

    /// Stop the poll thread deterministically. Idempotent; once this
    /// returns no further events will be delivered.
    pub fn stop_monitoring(&mut self) {
        {
            let mut state = lock(&self.shared.state);
            state.stopped = true;
        }
        self.shared.wake.notify_all();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            debug!("idle watchdog stopped");
        }
    }

    /// Whether the poll thread is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for IdleWatchdog {
    fn drop(&mut self) {
        self.stop_monitoring();
    }
}

/// Lock that shrugs off poisoning: a panicking peer must not take the
/// watchdog down with it.
fn lock<'a, T>(mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn poll_loop(shared: Arc<Shared>, config: WatchdogConfig, events: Sender<IdleEvent>) {
    let mut state = lock(&shared.state);
    loop {
        if state.stopped {
            return;
        }
        let (guard, timeout) = shared
            .wake
            .wait_timeout(state, config.poll_interval)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state = guard;
        if state.stopped {
            return;
        }
        if !timeout.timed_out() {
            // Woken early (stop or spurious); not a poll boundary.
            continue;
        }

        let idle = state.last_interaction.elapsed();
        if idle > config.severe_after {
            state.strikes += 1;
            // Reset the clock so the severe nudge does not re-fire on
            // every subsequent poll.
            state.last_interaction = Instant::now();
            let event = IdleEvent {
                level: IdleLevel::Severe,
                message: "Long idle stretch. Stand up, reset, then restart the timer."
                    .to_string(),
                timestamp: Utc::now(),
            };
            if events.send(event).is_err() {
                debug!("idle event receiver dropped; watchdog exiting");
                return;
            }
        } else if idle > config.mild_after && state.strikes == 0 && !state.mild_fired {
            state.mild_fired = true;
            let event = IdleEvent {
                level: IdleLevel::Mild,
                message: "Still there? A tiny next step beats a perfect plan.".to_string(),
                timestamp: Utc::now(),
            };
            if events.send(event).is_err() {
                debug!("idle event receiver dropped; watchdog exiting");
                return;
            }
        }
    }
}
