//! Plain-text day report export.
//!
//! Write-only, filename keyed by the current date. No machine-readable
//! schema is promised.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::PersistenceError;
use crate::reward::RewardStats;
use crate::session::{self, SessionRecord};
use crate::task::TaskStore;

/// Render the report body.
pub fn render(
    stats: &RewardStats,
    sessions: &[SessionRecord],
    tasks: &TaskStore,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "StudyFlow report - {}", now.format("%Y-%m-%d %H:%M"));
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out);
    let _ = writeln!(out, "Sessions completed today: {}", sessions.len());
    let _ = writeln!(out, "Focus minutes today: {}", session::total_minutes(sessions));
    let _ = writeln!(out, "Lifetime sessions: {}", stats.sessions);
    let _ = writeln!(out, "Lifetime focus minutes: {}", stats.minutes);
    let _ = writeln!(out, "Best streak: {}", stats.best_streak);
    if !stats.achievements.is_empty() {
        let unlocked: Vec<String> = stats.achievements.iter().map(u32::to_string).collect();
        let _ = writeln!(out, "Milestones unlocked: {}", unlocked.join(", "));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Sessions:");
    for record in sessions {
        let _ = writeln!(
            out,
            "  {} - {} min - {}",
            record.completed_at.format("%H:%M"),
            record.minutes,
            record.subject
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Completed tasks:");
    for task in tasks.tasks().iter().filter(|t| t.done) {
        let _ = writeln!(out, "  [x] {}", task.text);
    }
    out
}

/// Write the report into `dir` as `studyflow_report_YYYY-MM-DD.txt` and
/// return the path.
pub fn write_report(
    dir: &Path,
    stats: &RewardStats,
    sessions: &[SessionRecord],
    tasks: &TaskStore,
    now: DateTime<Utc>,
) -> Result<PathBuf, PersistenceError> {
    let path = dir.join(format!("studyflow_report_{}.txt", now.format("%Y-%m-%d")));
    let body = render(stats, sessions, tasks, now);
    std::fs::write(&path, body).map_err(|source| PersistenceError::WriteFailed {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Difficulty;

    #[test]
    fn report_lists_sessions_and_done_tasks() {
        let mut tasks = TaskStore::new();
        let id = tasks.add("essay", Difficulty::High).unwrap().id.clone();
        tasks.add("reading", Difficulty::Low).unwrap();
        tasks.toggle_done(&id).unwrap();

        let sessions = vec![SessionRecord::new(Utc::now(), 15, Some("essay".into()))];
        let stats = RewardStats {
            sessions: 3,
            minutes: 45,
            best_streak: 3,
            achievements: vec![1, 3],
        };

        let body = render(&stats, &sessions, &tasks, Utc::now());
        assert!(body.contains("Sessions completed today: 1"));
        assert!(body.contains("15 min - essay"));
        assert!(body.contains("[x] essay"));
        assert!(!body.contains("[x] reading"));
        assert!(body.contains("Milestones unlocked: 1, 3"));
    }

    #[test]
    fn filename_is_keyed_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let path = write_report(
            dir.path(),
            &RewardStats::default(),
            &[],
            &TaskStore::new(),
            now,
        )
        .unwrap();
        let expected = format!("studyflow_report_{}.txt", now.format("%Y-%m-%d"));
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), expected);
        assert!(path.exists());
    }
}
