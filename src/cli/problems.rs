use anyhow::Result;

use crate::core::{AppConfig, ProblemCatalog};

pub fn run(config: &AppConfig) -> Result<()> {
    let catalog = ProblemCatalog::load(&config.problems_path)?;
    for category in catalog.categories() {
        println!("{}", category.name);
        for problem in category.problems {
            println!(
                "  {:<12} {} ({} targets)",
                problem.id,
                problem.sub_label(),
                problem.targets.len()
            );
        }
    }
    Ok(())
}
