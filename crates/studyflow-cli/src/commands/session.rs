use std::time::Duration;

use clap::Subcommand;
use studyflow_core::{App, Event, EMERGENCY_MINUTES};

use super::print_event;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a focus session in the foreground until it completes
    Run {
        /// Session length in minutes (defaults to the energy recommendation)
        #[arg(long)]
        minutes: Option<u64>,
        /// Use the 10-minute emergency preset for bad days
        #[arg(long, conflicts_with = "minutes")]
        emergency: bool,
        /// Id of the task to study
        #[arg(long)]
        task: Option<String>,
    },
    /// Print the current state snapshot as JSON
    Status,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::load_default()?;

    match action {
        SessionAction::Run {
            minutes,
            emergency,
            task,
        } => {
            if let Some(id) = task {
                let selected = app.select_task(&id)?;
                eprintln!("studying: {}", selected.text);
            }
            let event = match (minutes, emergency) {
                (_, true) => app.start_with_minutes(EMERGENCY_MINUTES),
                (Some(m), false) => app.start_with_minutes(m),
                (None, false) => app.start(),
            }
            .ok_or("could not start a session (invalid length?)")?;
            print_event(&event)?;

            // Owner loop: drain idle events every 100ms, tick every second.
            let mut beats: u32 = 0;
            loop {
                std::thread::sleep(Duration::from_millis(100));
                beats = beats.wrapping_add(1);

                for idle in app.drain_idle_events() {
                    println!("{}", serde_json::to_string_pretty(&idle)?);
                }

                if beats % 10 == 0 {
                    if let Some(event) = app.tick() {
                        let completed = matches!(event, Event::SessionCompleted { .. });
                        print_event(&event)?;
                        if completed {
                            break;
                        }
                    }
                }
            }
        }
        SessionAction::Status => {
            print_event(&app.snapshot_event())?;
        }
    }

    Ok(())
}
