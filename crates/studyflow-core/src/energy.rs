//! Energy profile: self-declared energy level mapped to session length
//! and task suitability.
//!
//! This is a static lookup, not a learned policy. All sixteen
//! level x difficulty combinations are covered deterministically.

use serde::{Deserialize, Serialize};

use crate::task::Difficulty;

/// Minimum-viable session length in minutes for bad days.
///
/// Does not touch stored settings; the presentation layer offers it as a
/// one-off start option.
pub const EMERGENCY_MINUTES: u64 = 10;

/// User-declared energy level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
    Minimal,
}

impl Default for EnergyLevel {
    fn default() -> Self {
        EnergyLevel::Medium
    }
}

impl EnergyLevel {
    /// Recommended focus session length in minutes for this level.
    pub fn recommended_minutes(&self) -> u64 {
        match self {
            EnergyLevel::High => 25,
            EnergyLevel::Medium => 15,
            EnergyLevel::Low => 10,
            EnergyLevel::Minimal => 5,
        }
    }

    /// Rank for comparisons: 0 is the highest level.
    fn rank(&self) -> u8 {
        match self {
            EnergyLevel::High => 0,
            EnergyLevel::Medium => 1,
            EnergyLevel::Low => 2,
            EnergyLevel::Minimal => 3,
        }
    }

    /// Parse from the lowercase name used in config and CLI arguments.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(EnergyLevel::High),
            "medium" => Some(EnergyLevel::Medium),
            "low" => Some(EnergyLevel::Low),
            "minimal" => Some(EnergyLevel::Minimal),
            _ => None,
        }
    }
}

/// Task-suitability verdict for a (difficulty, level) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Suggestion {
    /// The current level is in the allowed set for this difficulty.
    Match,
    /// Hard work on low or minimal energy: defer it.
    Postpone,
    /// Any other mismatch: shrink or reshape the task instead.
    Adapt,
}

/// Suitability of working on `difficulty` at `level`.
///
/// A level matches when it sits at or above the difficulty's own tier;
/// minimal-difficulty work matches any level. Postpone fires only for
/// high-difficulty work on low or minimal energy.
pub fn suggest(difficulty: Difficulty, level: EnergyLevel) -> Suggestion {
    if level.rank() <= difficulty.rank() {
        return Suggestion::Match;
    }
    if difficulty == Difficulty::High
        && matches!(level, EnergyLevel::Low | EnergyLevel::Minimal)
    {
        return Suggestion::Postpone;
    }
    Suggestion::Adapt
}
