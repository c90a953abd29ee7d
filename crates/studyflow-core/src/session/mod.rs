mod controller;
mod record;

pub use controller::{BreakPolicy, SessionController, SessionState};
pub use record::{total_minutes, SessionRecord};
