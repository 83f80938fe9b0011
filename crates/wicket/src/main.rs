// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wicket - a support-ticket bot for Discord.
//!
//! This is the binary entry point for the Wicket bot.

use clap::{Parser, Subcommand};

mod doctor;
mod serve;

/// Wicket - a support-ticket bot for Discord.
#[derive(Parser, Debug)]
#[command(name = "wicket", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect to Discord and serve tickets.
    Serve,
    /// Run diagnostic checks against the configuration and database.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match wicket_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            wicket_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) | None => {
            if let Err(errors) = wicket_config::validate_for_serve(&config) {
                wicket_config::render_errors(&errors);
                std::process::exit(1);
            }
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Doctor) => {
            if let Err(e) = doctor::run_doctor(&config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }
}
