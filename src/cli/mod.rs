use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod practice;
pub mod problems;
pub mod serve;

use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Run the API server and browser UI
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Work through a problem with the tutor in the terminal
    Practice {
        #[arg(long)]
        problem: String,
    },
    /// List the loaded problems by category
    Problems {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        Some(Command::Practice { problem }) => {
            practice::run(&problem, config).await?;
        }
        Some(Command::Problems {}) => {
            problems::run(&config)?;
        }
        None => {}
    }

    Ok(())
}
