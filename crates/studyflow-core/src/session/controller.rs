//! Session state machine.
//!
//! The controller is tick-driven. It owns no countdown thread: the owner
//! loop calls `tick()` once per second, so session state never has
//! concurrent writers. The idle watchdog is the one background thread and
//! it only ever talks back through its event channel.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Complete -> Idle
//!           ^                                                  |
//!           +----------------- reset() (from any state) -------+
//! ```
//!
//! `Complete` is transient: the tick that reaches zero registers the
//! session with the ledger and lands back in `Idle` before returning.
//! Out-of-order commands are no-ops, never errors.

use std::sync::mpsc::Sender;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::Event;
use crate::reward::RewardLedger;
use crate::watchdog::{IdleEvent, IdleWatchdog, WatchdogConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    /// Transient: observable only inside the completing tick.
    Complete,
}

/// Break recommendation parameters, applied at session completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakPolicy {
    pub short_break_minutes: u64,
    pub long_break_minutes: u64,
    /// Every Nth completed session earns the long break.
    pub sessions_before_long_break: u32,
}

impl Default for BreakPolicy {
    fn default() -> Self {
        Self {
            short_break_minutes: 5,
            long_break_minutes: 30,
            sessions_before_long_break: 3,
        }
    }
}

/// Owns the state of one focus session at a time.
pub struct SessionController {
    state: SessionState,
    total_seconds: u64,
    remaining_seconds: u64,
    pause_count: u32,
    started_at: Option<DateTime<Utc>>,
    subject: Option<String>,
    breaks: BreakPolicy,
    watchdog_config: Option<WatchdogConfig>,
    idle_tx: Option<Sender<IdleEvent>>,
    watchdog: Option<IdleWatchdog>,
}

impl SessionController {
    /// Controller with default break policy and no idle watchdog.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            total_seconds: 0,
            remaining_seconds: 0,
            pause_count: 0,
            started_at: None,
            subject: None,
            breaks: BreakPolicy::default(),
            watchdog_config: None,
            idle_tx: None,
            watchdog: None,
        }
    }

    pub fn with_breaks(mut self, breaks: BreakPolicy) -> Self {
        self.breaks = breaks;
        self
    }

    /// Enable the idle watchdog. It runs while a session is Running and
    /// posts into `events`.
    pub fn with_watchdog(mut self, config: WatchdogConfig, events: Sender<IdleEvent>) -> Self {
        self.watchdog_config = Some(config);
        self.idle_tx = Some(events);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn pause_count(&self) -> u32 {
        self.pause_count
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// 0.0 .. 1.0 progress within the session.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_seconds as f64 / self.total_seconds as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds,
            pause_count: self.pause_count,
            progress: self.progress(),
            subject: self.subject.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session of `minutes` focus time. No-op unless Idle;
    /// zero-length sessions are refused.
    pub fn start(&mut self, minutes: u64, subject: Option<String>) -> Option<Event> {
        if self.state != SessionState::Idle {
            return None;
        }
        if minutes == 0 {
            debug!("refusing zero-length session");
            return None;
        }
        self.total_seconds = minutes * 60;
        self.remaining_seconds = self.total_seconds;
        self.pause_count = 0;
        self.started_at = Some(Utc::now());
        self.subject = subject;
        self.state = SessionState::Running;
        self.start_watchdog();
        Some(Event::SessionStarted {
            total_seconds: self.total_seconds,
            subject: self.subject.clone(),
            at: Utc::now(),
        })
    }

    /// No-op unless Running.
    pub fn pause(&mut self) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.state = SessionState::Paused;
        self.pause_count += 1;
        self.stop_watchdog();
        Some(Event::SessionPaused {
            remaining_seconds: self.remaining_seconds,
            pause_count: self.pause_count,
            at: Utc::now(),
        })
    }

    /// No-op unless Paused. Does not touch pause_count.
    pub fn resume(&mut self) -> Option<Event> {
        if self.state != SessionState::Paused {
            return None;
        }
        self.state = SessionState::Running;
        self.start_watchdog();
        Some(Event::SessionResumed {
            remaining_seconds: self.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Unconditional and idempotent. Discards the session without
    /// registering anything.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = SessionState::Idle;
        self.remaining_seconds = 0;
        self.started_at = None;
        self.subject = None;
        self.stop_watchdog();
        Some(Event::SessionReset { at: Utc::now() })
    }

    /// Advance the countdown by one second. Call once per second while a
    /// session runs; ticks in any other state are no-ops.
    ///
    /// The tick that reaches zero registers the session with `ledger`
    /// exactly once and returns the completion event.
    pub fn tick(&mut self, ledger: &mut RewardLedger) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }

        self.state = SessionState::Complete;
        self.stop_watchdog();

        let minutes = self.total_seconds / 60;
        let quality = (1.0 - 0.1 * f64::from(self.pause_count)).max(0.5);
        let reward = ledger.register_session(minutes, quality);

        let long_break = reward.session_count % self.breaks.sessions_before_long_break == 0;
        let break_minutes = if long_break {
            self.breaks.long_break_minutes
        } else {
            self.breaks.short_break_minutes
        };

        let subject = self.subject.take();
        self.state = SessionState::Idle;
        self.started_at = None;

        Some(Event::SessionCompleted {
            minutes,
            quality,
            subject,
            reward,
            break_minutes,
            long_break,
            at: Utc::now(),
        })
    }

    /// Forward user activity to the watchdog, if one is running.
    pub fn register_interaction(&self) {
        if let Some(watchdog) = &self.watchdog {
            watchdog.register_interaction();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn start_watchdog(&mut self) {
        self.stop_watchdog();
        if let (Some(config), Some(tx)) = (self.watchdog_config, &self.idle_tx) {
            self.watchdog = Some(IdleWatchdog::spawn(config, tx.clone()));
        }
    }

    fn stop_watchdog(&mut self) {
        if let Some(mut watchdog) = self.watchdog.take() {
            watchdog.stop_monitoring();
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> RewardLedger {
        RewardLedger::with_seed(7)
    }

    #[test]
    fn start_pause_resume() {
        let mut controller = SessionController::new();
        assert_eq!(controller.state(), SessionState::Idle);

        assert!(controller.start(15, None).is_some());
        assert_eq!(controller.state(), SessionState::Running);
        assert_eq!(controller.remaining_seconds(), 900);

        assert!(controller.pause().is_some());
        assert_eq!(controller.state(), SessionState::Paused);
        assert_eq!(controller.pause_count(), 1);

        assert!(controller.resume().is_some());
        assert_eq!(controller.state(), SessionState::Running);
        assert_eq!(controller.pause_count(), 1);
    }

    #[test]
    fn out_of_order_commands_are_noops() {
        let mut controller = SessionController::new();
        let mut ledger = ledger();

        assert!(controller.pause().is_none());
        assert!(controller.resume().is_none());
        assert!(controller.tick(&mut ledger).is_none());

        controller.start(15, None);
        assert!(controller.start(25, None).is_none(), "start while running");
        assert!(controller.resume().is_none(), "resume while running");

        controller.pause();
        assert!(controller.pause().is_none(), "pause while paused");
        assert!(controller.tick(&mut ledger).is_none(), "tick while paused");
        assert_eq!(controller.pause_count(), 1);
    }

    #[test]
    fn zero_length_session_is_refused() {
        let mut controller = SessionController::new();
        assert!(controller.start(0, None).is_none());
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[test]
    fn ticks_count_down_to_completion() {
        let mut controller = SessionController::new();
        let mut ledger = ledger();
        controller.start(1, Some("algebra".into()));

        for _ in 0..59 {
            assert!(controller.tick(&mut ledger).is_none());
        }
        assert_eq!(controller.remaining_seconds(), 1);

        let event = controller.tick(&mut ledger).expect("completion event");
        match event {
            Event::SessionCompleted {
                minutes,
                quality,
                subject,
                ..
            } => {
                assert_eq!(minutes, 1);
                assert_eq!(quality, 1.0);
                assert_eq!(subject.as_deref(), Some("algebra"));
            }
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(ledger.session_count(), 1);
    }

    #[test]
    fn reset_discards_without_registering() {
        let mut controller = SessionController::new();
        let mut ledger = ledger();
        controller.start(15, None);
        for _ in 0..100 {
            controller.tick(&mut ledger);
        }
        assert!(controller.reset().is_some());
        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(controller.remaining_seconds(), 0);
        assert_eq!(ledger.session_count(), 0);

        // Idempotent from Idle too.
        assert!(controller.reset().is_some());
    }

    #[test]
    fn quality_degrades_with_pauses_and_floors_at_half() {
        let mut controller = SessionController::new();
        let mut ledger = ledger();
        controller.start(1, None);
        for _ in 0..7 {
            controller.pause();
            controller.resume();
        }
        assert_eq!(controller.pause_count(), 7);
        let event = run_to_completion(&mut controller, &mut ledger);
        match event {
            Event::SessionCompleted { quality, .. } => assert_eq!(quality, 0.5),
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
    }

    #[test]
    fn long_break_every_nth_session() {
        let mut controller = SessionController::new().with_breaks(BreakPolicy {
            short_break_minutes: 5,
            long_break_minutes: 30,
            sessions_before_long_break: 3,
        });
        let mut ledger = ledger();

        for expected_long in [false, false, true, false, false, true] {
            controller.start(1, None);
            let event = run_to_completion(&mut controller, &mut ledger);
            match event {
                Event::SessionCompleted {
                    long_break,
                    break_minutes,
                    ..
                } => {
                    assert_eq!(long_break, expected_long);
                    assert_eq!(break_minutes, if expected_long { 30 } else { 5 });
                }
                other => panic!("expected SessionCompleted, got {other:?}"),
            }
        }
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut controller = SessionController::new();
        let mut ledger = ledger();
        controller.start(1, None);
        for _ in 0..30 {
            controller.tick(&mut ledger);
        }
        match controller.snapshot() {
            Event::StateSnapshot {
                state,
                remaining_seconds,
                total_seconds,
                progress,
                ..
            } => {
                assert_eq!(state, SessionState::Running);
                assert_eq!(remaining_seconds, 30);
                assert_eq!(total_seconds, 60);
                assert!((progress - 0.5).abs() < 1e-9);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    fn run_to_completion(
        controller: &mut SessionController,
        ledger: &mut RewardLedger,
    ) -> Event {
        loop {
            if let Some(event) = controller.tick(ledger) {
                return event;
            }
        }
    }
}
