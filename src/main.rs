mod board;
mod client;
mod commands;
mod config;
mod models;
mod web;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use models::Config;

/// Activity board: browse school activities, sign students up and remove them.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log backend requests and responses
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct Common {
    /// Path to config file (defaults apply when omitted)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Override the activities backend URL from config
    #[arg(short = 'b', long)]
    backend: Option<String>,
}

impl Common {
    fn load(&self) -> Result<Config> {
        let mut cfg = config::load_config(self.config.as_deref())?;
        if let Some(backend) = &self.backend {
            cfg.backend.base_url = backend.clone();
        }
        Ok(cfg)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web board
    Serve {
        #[command(flatten)]
        common: Common,

        /// Listen address (e.g. "0.0.0.0:3000"); overrides config
        #[arg(short = 'a', long)]
        addr: Option<String>,
    },

    /// Print all activities with their participants
    List {
        #[command(flatten)]
        common: Common,
    },

    /// Sign a student up for an activity
    ///
    /// Example:
    ///   signup michael@mergington.edu "Chess Club"
    Signup {
        /// Student email
        email: String,

        /// Activity name
        activity: String,

        #[command(flatten)]
        common: Common,
    },

    /// Remove a student from an activity
    Unregister {
        /// Student email
        email: String,

        /// Activity name
        activity: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        #[command(flatten)]
        common: Common,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match &cli.command {
        Command::Serve { common, addr } => {
            let cfg = common.load()?;
            let addr = addr.clone().unwrap_or_else(|| cfg.server.addr.clone());
            web::serve(cfg, &addr).await?;
        }
        Command::List { common } => {
            let cfg = common.load()?;
            commands::run_list(&cfg).await?;
        }
        Command::Signup {
            email,
            activity,
            common,
        } => {
            let cfg = common.load()?;
            commands::run_signup(&cfg, email, activity).await?;
        }
        Command::Unregister {
            email,
            activity,
            yes,
            common,
        } => {
            let cfg = common.load()?;
            commands::run_unregister(&cfg, email, activity, *yes).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_unregister() {
        let cli = Cli::parse_from([
            "activity-board",
            "unregister",
            "a@x.com",
            "Chess Club",
            "--yes",
            "-b",
            "http://api:8000",
        ]);
        match cli.command {
            Command::Unregister {
                email,
                activity,
                yes,
                common,
            } => {
                assert_eq!(email, "a@x.com");
                assert_eq!(activity, "Chess Club");
                assert!(yes);
                assert_eq!(common.load().unwrap().backend.base_url, "http://api:8000");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
