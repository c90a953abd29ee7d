use clap::Subcommand;
use studyflow_core::{suggest, App, Difficulty, EnergyLevel, ValidationError};

#[derive(Subcommand)]
pub enum EnergyAction {
    /// Print the current level and its recommended session length
    Show,
    /// Declare the current energy level (high | medium | low | minimal)
    Set { level: String },
    /// Verdict for a difficulty at the current level
    Suggest {
        /// high | medium | low | minimal
        difficulty: String,
    },
}

fn parse_level(value: &str) -> Result<EnergyLevel, ValidationError> {
    EnergyLevel::parse(value).ok_or_else(|| ValidationError::InvalidValue {
        field: "energy".to_string(),
        message: format!("'{value}' is not one of high, medium, low, minimal"),
    })
}

fn parse_difficulty(value: &str) -> Result<Difficulty, ValidationError> {
    Difficulty::parse(value).ok_or_else(|| ValidationError::InvalidValue {
        field: "difficulty".to_string(),
        message: format!("'{value}' is not one of high, medium, low, minimal"),
    })
}

pub fn run(action: EnergyAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::load_default()?;

    match action {
        EnergyAction::Show => {
            let level = app.energy();
            println!(
                "{}",
                serde_json::json!({
                    "energy": level,
                    "recommended_minutes": level.recommended_minutes(),
                })
            );
        }
        EnergyAction::Set { level } => {
            let level = parse_level(&level)?;
            app.set_energy(level);
            println!(
                "energy set; next session: {} minutes",
                level.recommended_minutes()
            );
        }
        EnergyAction::Suggest { difficulty } => {
            let difficulty = parse_difficulty(&difficulty)?;
            let verdict = suggest(difficulty, app.energy());
            println!(
                "{}",
                serde_json::json!({
                    "difficulty": difficulty,
                    "energy": app.energy(),
                    "verdict": verdict,
                })
            );
        }
    }

    Ok(())
}
