use std::path::PathBuf;

use clap::Subcommand;
use studyflow_core::{session, storage, App};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Print ledger statistics and today's history as JSON
    Show,
    /// Write the plain-text day report
    Report {
        /// Target directory (defaults to the app data directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::load_default()?;

    match action {
        StatsAction::Show => {
            let stats = app.ledger().stats();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "reward_stats": stats,
                    "current_streak": app.ledger().current_streak(),
                    "today_sessions": app.sessions().len(),
                    "today_minutes": session::total_minutes(app.sessions()),
                }))?
            );
        }
        StatsAction::Report { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => storage::data_dir()?,
            };
            let path = app.write_report(&dir)?;
            println!("report written: {}", path.display());
        }
    }

    Ok(())
}
