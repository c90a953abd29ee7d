//! Application context.
//!
//! One explicitly constructed object owns every long-lived piece of core
//! state: the session controller, the reward ledger, the task store, the
//! day's session history, and the idle-event channel. The presentation
//! layer holds an `App`, calls one method per user command, renders the
//! returned [`Event`]s, and drains idle events at its own cadence. There
//! are no ambient globals.
//!
//! Persistence is best-effort: state-changing commands autosave the
//! snapshot, and a failed save is logged and swallowed, never surfaced as
//! a command failure.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use chrono::Utc;
use tracing::warn;

use crate::energy::{self, EnergyLevel, Suggestion};
use crate::error::{PersistenceError, ValidationError};
use crate::events::Event;
use crate::report;
use crate::reward::RewardLedger;
use crate::session::{SessionController, SessionRecord, SessionState};
use crate::storage::{Config, Settings, Snapshot};
use crate::task::{Difficulty, Task, TaskStore};
use crate::watchdog::IdleEvent;

pub struct App {
    config: Config,
    snapshot_path: PathBuf,
    controller: SessionController,
    ledger: RewardLedger,
    tasks: TaskStore,
    sessions: Vec<SessionRecord>,
    energy: EnergyLevel,
    selected_task: Option<String>,
    idle_events: Receiver<IdleEvent>,
}

impl App {
    /// Build the context from a loaded snapshot.
    pub fn new(config: Config, mut snapshot: Snapshot, snapshot_path: PathBuf) -> Self {
        let mut ledger = RewardLedger::from_stats(snapshot.reward_stats.clone(), config.reward_seed);
        if snapshot.rollover(Utc::now().date_naive()) {
            // A day went by without a session: the streak is over.
            ledger.break_streak();
        }

        let (idle_tx, idle_rx) = mpsc::channel();
        let controller = SessionController::new()
            .with_breaks(config.break_policy())
            .with_watchdog(config.watchdog_config(), idle_tx);

        Self {
            config,
            snapshot_path,
            controller,
            ledger,
            tasks: snapshot.tasks,
            sessions: snapshot.sessions,
            energy: snapshot.settings.energy,
            selected_task: None,
            idle_events: idle_rx,
        }
    }

    /// Load config and snapshot from the default data directory.
    pub fn load_default() -> Result<Self, PersistenceError> {
        let config = Config::load_or_default();
        let path = Snapshot::default_path()?;
        let snapshot = Snapshot::load_or_default(&path);
        Ok(Self::new(config, snapshot, path))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.controller.state()
    }

    pub fn energy(&self) -> EnergyLevel {
        self.energy
    }

    pub fn ledger(&self) -> &RewardLedger {
        &self.ledger
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    pub fn snapshot_event(&self) -> Event {
        self.controller.snapshot()
    }

    /// Suitability verdict for a difficulty at the current energy level.
    pub fn suggestion_for(&self, difficulty: Difficulty) -> Suggestion {
        energy::suggest(difficulty, self.energy)
    }

    // ── Session commands ─────────────────────────────────────────────

    /// Start a session sized by the current energy level.
    pub fn start(&mut self) -> Option<Event> {
        self.start_with_minutes(self.energy.recommended_minutes())
    }

    /// Start a session of an explicit length (emergency preset, custom).
    pub fn start_with_minutes(&mut self, minutes: u64) -> Option<Event> {
        let subject = self
            .selected_task
            .as_ref()
            .and_then(|id| self.tasks.select_for_study(id).ok())
            .map(|t| t.text.clone());
        self.controller.start(minutes, subject)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.controller.pause()
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.controller.resume()
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.controller.reset()
    }

    /// Advance the countdown by one second. On completion the session is
    /// recorded in the day history and the snapshot is autosaved.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.controller.tick(&mut self.ledger)?;
        if let Event::SessionCompleted {
            minutes, subject, at, ..
        } = &event
        {
            self.sessions
                .push(SessionRecord::new(*at, *minutes, subject.clone()));
            self.autosave();
        }
        Some(event)
    }

    /// Forward user activity to the idle watchdog.
    pub fn register_interaction(&self) {
        self.controller.register_interaction();
    }

    /// Drain queued idle events, oldest first.
    pub fn drain_idle_events(&mut self) -> Vec<IdleEvent> {
        self.idle_events.try_iter().collect()
    }

    // ── Task commands ────────────────────────────────────────────────

    pub fn add_task(
        &mut self,
        text: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Task, ValidationError> {
        let task = self.tasks.add(text, difficulty)?;
        self.autosave();
        Ok(task)
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<bool, ValidationError> {
        let done = self.tasks.toggle_done(id)?;
        self.autosave();
        Ok(done)
    }

    pub fn remove_task(&mut self, id: &str) -> Result<Task, ValidationError> {
        let removed = self.tasks.remove(id)?;
        if self.selected_task.as_deref() == Some(id) {
            self.selected_task = None;
        }
        self.autosave();
        Ok(removed)
    }

    /// Mark a task as the study subject for the next session.
    pub fn select_task(&mut self, id: &str) -> Result<Task, ValidationError> {
        let task = self.tasks.select_for_study(id)?.clone();
        self.selected_task = Some(task.id.clone());
        Ok(task)
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn set_energy(&mut self, level: EnergyLevel) {
        self.energy = level;
        self.autosave();
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Write the snapshot now.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let mut snapshot = Snapshot {
            tasks: self.tasks.clone(),
            sessions: self.sessions.clone(),
            reward_stats: self.ledger.stats(),
            settings: Settings {
                energy: self.energy,
            },
            last_save: Utc::now(),
        };
        snapshot.save(&self.snapshot_path)
    }

    /// Write the day report into `dir` and return its path.
    pub fn write_report(&self, dir: &std::path::Path) -> Result<PathBuf, PersistenceError> {
        report::write_report(
            dir,
            &self.ledger.stats(),
            &self.sessions,
            &self.tasks,
            Utc::now(),
        )
    }

    fn autosave(&mut self) {
        if let Err(e) = self.save() {
            warn!("snapshot save failed: {e}");
        }
    }

    /// Access to loaded configuration (read-only).
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_in(dir: &std::path::Path) -> App {
        let config = Config {
            reward_seed: Some(7),
            ..Default::default()
        };
        let path = dir.join("studyflow_data.json");
        let snapshot = Snapshot::load_or_default(&path);
        App::new(config, snapshot, path)
    }

    #[test]
    fn completion_records_session_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        let id = app.add_task("algebra", Difficulty::Medium).unwrap().id;
        app.select_task(&id).unwrap();
        app.start_with_minutes(1).unwrap();
        let mut completed = None;
        for _ in 0..60 {
            if let Some(event) = app.tick() {
                completed = Some(event);
            }
        }
        assert!(matches!(completed, Some(Event::SessionCompleted { .. })));
        assert_eq!(app.sessions().len(), 1);
        assert_eq!(app.sessions()[0].subject, "algebra");

        // Reload from disk: ledger stats and history survive.
        let reloaded = app_in(dir.path());
        assert_eq!(reloaded.ledger().session_count(), 1);
        assert_eq!(reloaded.sessions().len(), 1);
        assert_eq!(reloaded.tasks().len(), 1);
    }

    #[test]
    fn start_uses_energy_recommendation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.set_energy(EnergyLevel::Minimal);
        let event = app.start().unwrap();
        match event {
            Event::SessionStarted { total_seconds, .. } => assert_eq!(total_seconds, 5 * 60),
            other => panic!("expected SessionStarted, got {other:?}"),
        }
    }

    #[test]
    fn removing_selected_task_clears_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let id = app.add_task("transient", Difficulty::Low).unwrap().id;
        app.select_task(&id).unwrap();
        app.remove_task(&id).unwrap();
        let event = app.start_with_minutes(1).unwrap();
        match event {
            Event::SessionStarted { subject, .. } => assert_eq!(subject, None),
            other => panic!("expected SessionStarted, got {other:?}"),
        }
    }
}
