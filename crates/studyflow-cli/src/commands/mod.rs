pub mod config;
pub mod energy;
pub mod session;
pub mod stats;
pub mod task;

use studyflow_core::Event;

/// Print an event as a pretty JSON line, the contract a GUI shell would
/// consume.
pub fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}
