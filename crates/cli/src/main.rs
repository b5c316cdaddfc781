//! StepAhead CLI - Operational diagnostics and test-data seeding.
//!
//! # Usage
//!
//! ```bash
//! # Check whether user documents exist in the document store
//! sa-cli check-users
//!
//! # Seed sample task-completion records for a test account
//! sa-cli seed tester@example.com mypassword
//! ```
//!
//! # Commands
//!
//! - `check-users` - List the `users` collection and report what was found
//! - `seed` - Sign in and write the fixed sample task-history records
//!
//! Both commands read backend settings from the environment (see
//! `stepahead_gateway::config`). Exit code is 0 on success, 1 on failure.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sa-cli")]
#[command(author, version, about = "StepAhead CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether user documents exist in the document store
    CheckUsers,
    /// Seed sample task-completion records for a test account
    Seed {
        /// Account email to sign in with
        email: String,

        /// Account password (missing value prints usage and exits 1)
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::CheckUsers => commands::check_users::run().await?,
        Commands::Seed { email, password } => {
            commands::seed::run(&email, password.as_deref()).await?;
        }
    }
    Ok(())
}
