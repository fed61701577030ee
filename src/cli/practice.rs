use anyhow::{Result, anyhow};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::agents::tutor;
use crate::ai::chat::models::strip_internal_status;
use crate::core::{AppConfig, ProblemCatalog};
use crate::grading::ProgressTracker;

pub async fn run(problem_id: &str, config: AppConfig) -> Result<()> {
    let catalog = ProblemCatalog::load(&config.problems_path)?;
    let problem = catalog
        .get(problem_id)
        .ok_or_else(|| anyhow!("Problem {} not found", problem_id))?;

    let mut rl = DefaultEditor::new()?;
    let user_name = rl.readline("Your name: ")?.trim().to_string();
    if user_name.is_empty() {
        anyhow::bail!("Identification is required for academic reporting");
    }

    let mut tracker = ProgressTracker::new(config.tolerance);
    tracker.ensure(&problem.id, problem.targets.keys());

    println!("[{}] {}\n", problem.category, problem.statement);
    let mut transcript = tutor::open_problem_chat(&config, &user_name, problem).await?;
    if let Some(greeting) = transcript.display().last() {
        println!("{}\n", greeting.text);
    }

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => {
                let newly = tracker.record_attempt(&problem.id, &line, &problem.targets);
                let (reply, next) =
                    tutor::problem_turn(&config, transcript, &line, &newly).await?;
                transcript = next;
                println!("{}", strip_internal_status(reply.text()));

                let progress = tracker.progress(&problem.id, problem.targets.len());
                println!(
                    "\n[{}/{} targets found]\n",
                    progress.satisfied, progress.total
                );
                if progress.is_complete() && !newly.is_empty() {
                    println!("All targets found. Press Ctrl-D to finish.\n");
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
