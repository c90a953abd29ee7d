//! # StudyFlow Core Library
//!
//! Core logic for the StudyFlow focus timer: a Pomodoro-style session
//! state machine with reward/streak bookkeeping, an idle-activity
//! watchdog, energy-based session sizing, and task tracking. The
//! presentation layer (CLI here, a GUI elsewhere) is a thin skin over
//! this crate: it issues commands, renders the returned events, and
//! drains the idle-event queue.
//!
//! ## Architecture
//!
//! - **SessionController**: tick-driven state machine; the caller invokes
//!   `tick()` once per second, so session state never has concurrent
//!   writers
//! - **RewardLedger**: pure session/streak/milestone counting
//! - **IdleWatchdog**: the one background thread; posts advisory nudges
//!   through an unbounded mpsc channel
//! - **Storage**: one JSON snapshot, overwritten wholesale, best-effort;
//!   TOML preferences in the app data directory
//!
//! ## Key Components
//!
//! - [`App`]: explicitly constructed application context, no globals
//! - [`SessionController`]: the session state machine
//! - [`RewardLedger`]: reward and streak bookkeeping
//! - [`IdleWatchdog`]: idle-activity nudger

pub mod app;
pub mod energy;
pub mod error;
pub mod events;
pub mod report;
pub mod reward;
pub mod session;
pub mod storage;
pub mod task;
pub mod watchdog;

pub use app::App;
pub use energy::{suggest, EnergyLevel, Suggestion, EMERGENCY_MINUTES};
pub use error::{CoreError, PersistenceError, Result, ValidationError};
pub use events::Event;
pub use reward::{RewardDescriptor, RewardLedger, RewardStats, MILESTONES};
pub use session::{BreakPolicy, SessionController, SessionRecord, SessionState};
pub use storage::{Config, Settings, Snapshot};
pub use task::{Difficulty, Task, TaskStore};
pub use watchdog::{IdleEvent, IdleLevel, IdleWatchdog, WatchdogConfig};
