use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reward::RewardDescriptor;
use crate::session::SessionState;

/// Every session state change produces an Event.
/// The presentation layer renders them; it never inspects core state
/// directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        total_seconds: u64,
        subject: Option<String>,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_seconds: u64,
        pause_count: u32,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    /// A session ran to completion. Carries the reward plus the
    /// recommended break; the core does not run break countdowns.
    SessionCompleted {
        minutes: u64,
        quality: f64,
        subject: Option<String>,
        reward: RewardDescriptor,
        break_minutes: u64,
        long_break: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        remaining_seconds: u64,
        total_seconds: u64,
        pause_count: u32,
        /// 0.0 .. 1.0 progress within the session.
        progress: f64,
        subject: Option<String>,
        at: DateTime<Utc>,
    },
}
