//! Persisted application snapshot.
//!
//! One JSON file, overwritten wholesale on each save. Loading is
//! best-effort: missing fields take their defaults and a corrupt or
//! unreadable file falls back to a fresh snapshot, never a fatal error.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::data_dir;
use crate::energy::EnergyLevel;
use crate::error::PersistenceError;
use crate::reward::RewardStats;
use crate::session::SessionRecord;
use crate::task::TaskStore;

const SNAPSHOT_FILE: &str = "studyflow_data.json";

/// User settings carried inside the snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub energy: EnergyLevel,
}

/// Everything that survives a restart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: TaskStore,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub reward_stats: RewardStats,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default = "Utc::now")]
    pub last_save: DateTime<Utc>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            tasks: TaskStore::default(),
            sessions: Vec::new(),
            reward_stats: RewardStats::default(),
            settings: Settings::default(),
            last_save: Utc::now(),
        }
    }
}

impl Snapshot {
    /// Default on-disk location: `<data_dir>/studyflow_data.json`.
    pub fn default_path() -> Result<PathBuf, PersistenceError> {
        Ok(data_dir()?.join(SNAPSHOT_FILE))
    }

    /// Strict load. A missing file is a fresh snapshot; an unreadable or
    /// unparsable one is an error.
    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(PersistenceError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|e| PersistenceError::ParseFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Best-effort load: any failure is logged and yields the default.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("snapshot load failed, starting fresh: {e}");
            Self::default()
        })
    }

    /// Stamp `last_save` and overwrite the file wholesale.
    pub fn save(&mut self, path: &Path) -> Result<(), PersistenceError> {
        self.last_save = Utc::now();
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            PersistenceError::ParseFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        std::fs::write(path, content).map_err(|source| PersistenceError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Day rollover: when the snapshot was last saved on an earlier
    /// calendar day, the session history starts over. Tasks and lifetime
    /// reward stats survive. Returns true when a day boundary was
    /// crossed, so the caller can break the streak.
    pub fn rollover(&mut self, today: NaiveDate) -> bool {
        if self.last_save.date_naive() < today {
            self.sessions.clear();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot::load(&dir.path().join("nope.json")).unwrap();
        assert!(snapshot.tasks.is_empty());
        assert_eq!(snapshot.reward_stats, RewardStats::default());
    }

    #[test]
    fn corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studyflow_data.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Snapshot::load(&path).is_err());
        let snapshot = Snapshot::load_or_default(&path);
        assert!(snapshot.sessions.is_empty());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.tasks.is_empty());
        assert_eq!(snapshot.settings.energy, EnergyLevel::Medium);
    }

    #[test]
    fn rollover_clears_sessions_only() {
        let mut snapshot = Snapshot::default();
        snapshot
            .tasks
            .add("carry me over", crate::task::Difficulty::Low)
            .unwrap();
        snapshot
            .sessions
            .push(SessionRecord::new(Utc::now(), 15, None));
        snapshot.reward_stats.sessions = 4;
        snapshot.last_save = Utc::now() - Duration::days(2);

        assert!(snapshot.rollover(Utc::now().date_naive()));
        assert!(snapshot.sessions.is_empty());
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.reward_stats.sessions, 4);

        // Same day: nothing happens.
        snapshot.last_save = Utc::now();
        snapshot
            .sessions
            .push(SessionRecord::new(Utc::now(), 15, None));
        assert!(!snapshot.rollover(Utc::now().date_naive()));
        assert_eq!(snapshot.sessions.len(), 1);
    }
}
