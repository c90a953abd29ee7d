use clap::Subcommand;
use studyflow_core::{App, Difficulty, ValidationError};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        text: String,
        /// high | medium | low | minimal
        #[arg(long, default_value = "medium")]
        difficulty: String,
    },
    /// List tasks in display order
    List,
    /// Toggle a task's done flag
    Done { id: String },
    /// Remove a task
    Remove { id: String },
    /// Print the suitability verdict for studying a task right now
    Suggest { id: String },
}

fn parse_difficulty(value: &str) -> Result<Difficulty, ValidationError> {
    Difficulty::parse(value).ok_or_else(|| ValidationError::InvalidValue {
        field: "difficulty".to_string(),
        message: format!("'{value}' is not one of high, medium, low, minimal"),
    })
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::load_default()?;

    match action {
        TaskAction::Add { text, difficulty } => {
            let difficulty = parse_difficulty(&difficulty)?;
            let task = app.add_task(text, difficulty)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List => {
            let tasks = app.tasks();
            for index in tasks.display_order() {
                let task = &tasks.tasks()[index];
                let mark = if task.done { "x" } else { " " };
                println!("[{mark}] {} ({:?}) {}", task.text, task.difficulty, task.id);
            }
        }
        TaskAction::Done { id } => {
            let done = app.toggle_task(&id)?;
            println!("{id}: done={done}");
        }
        TaskAction::Remove { id } => {
            let removed = app.remove_task(&id)?;
            println!("removed: {}", removed.text);
        }
        TaskAction::Suggest { id } => {
            let task = app.tasks().select_for_study(&id)?.clone();
            let verdict = app.suggestion_for(task.difficulty);
            println!(
                "{}",
                serde_json::json!({
                    "task": task.text,
                    "difficulty": task.difficulty,
                    "energy": app.energy(),
                    "verdict": verdict,
                })
            );
        }
    }

    Ok(())
}
