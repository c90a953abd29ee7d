//! Reward and streak bookkeeping.
//!
//! Pure counting: the ledger never looks at the clock or the calendar.
//! Deciding when a streak breaks (a missed day, say) is the caller's
//! business via [`RewardLedger::break_streak`].

use std::collections::BTreeSet;

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

/// Session-count thresholds that unlock a one-time achievement, ascending.
pub const MILESTONES: [u32; 8] = [1, 3, 5, 10, 15, 20, 25, 50];

/// Quality strictly above this carries the bonus flag.
const BONUS_QUALITY: f64 = 0.9;

const MESSAGES: [&str; 6] = [
    "Session done. That focus was real.",
    "Another block in the wall. Keep stacking.",
    "Brain fed its dopamine. Well earned.",
    "Consistency beats intensity. Proof delivered.",
    "One more session your future self will thank you for.",
    "Focus logged. Stretch, hydrate, breathe.",
];

/// What a completed session earned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardDescriptor {
    /// Celebration text drawn from a fixed pool. Presentation detail.
    pub message: String,
    /// Milestone unlocked by this session, if it crossed a threshold.
    pub milestone: Option<u32>,
    /// Set when quality was strictly greater than 0.9.
    pub bonus: bool,
    pub session_count: u32,
    pub current_streak: u32,
}

/// Persisted view of the ledger. The current streak is deliberately
/// absent: it does not survive a restart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewardStats {
    #[serde(default)]
    pub sessions: u32,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub achievements: Vec<u32>,
}

/// Session count, focus minutes, streaks, and the unlocked milestone set.
///
/// Mutated only by [`register_session`](Self::register_session) and
/// [`break_streak`](Self::break_streak).
#[derive(Debug, Clone)]
pub struct RewardLedger {
    session_count: u32,
    total_focus_minutes: u64,
    current_streak: u32,
    best_streak: u32,
    unlocked: BTreeSet<u32>,
    rng: Mcg128Xsl64,
}

impl RewardLedger {
    /// Fresh ledger with an entropy-seeded message source.
    pub fn new() -> Self {
        Self::from_stats(RewardStats::default(), None)
    }

    /// Fresh ledger with a fixed seed, for deterministic message choice.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_stats(RewardStats::default(), Some(seed))
    }

    /// Rebuild from persisted stats. `seed` fixes the message source;
    /// `None` seeds from entropy.
    pub fn from_stats(stats: RewardStats, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            session_count: stats.sessions,
            total_focus_minutes: stats.minutes,
            current_streak: 0,
            best_streak: stats.best_streak,
            unlocked: stats.achievements.into_iter().collect(),
            rng,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn total_focus_minutes(&self) -> u64 {
        self.total_focus_minutes
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Unlocked milestone thresholds, ascending.
    pub fn achievements(&self) -> Vec<u32> {
        self.unlocked.iter().copied().collect()
    }

    /// Snapshot for persistence.
    pub fn stats(&self) -> RewardStats {
        RewardStats {
            sessions: self.session_count,
            minutes: self.total_focus_minutes,
            best_streak: self.best_streak,
            achievements: self.achievements(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record one completed session and compute its reward.
    pub fn register_session(&mut self, minutes: u64, quality: f64) -> RewardDescriptor {
        self.session_count += 1;
        self.total_focus_minutes += minutes;
        self.current_streak += 1;
        self.best_streak = self.best_streak.max(self.current_streak);

        let milestone = if MILESTONES.contains(&self.session_count)
            && self.unlocked.insert(self.session_count)
        {
            Some(self.session_count)
        } else {
            None
        };

        let message = MESSAGES[self.rng.gen_range(0..MESSAGES.len())].to_string();

        RewardDescriptor {
            message,
            milestone,
            bonus: quality > BONUS_QUALITY,
            session_count: self.session_count,
            current_streak: self.current_streak,
        }
    }

    /// Zero the current streak. Session count, minutes, and best streak
    /// are untouched.
    pub fn break_streak(&mut self) {
        self.current_streak = 0;
    }
}

impl Default for RewardLedger {
    fn default() -> Self {
        Self::new()
    }
}
