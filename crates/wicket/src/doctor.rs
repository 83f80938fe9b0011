// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wicket doctor` command implementation.
//!
//! Runs quick diagnostic checks against the configuration and the ticket
//! database without touching Discord.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use wicket_config::WicketConfig;
use wicket_core::WicketError;
use wicket_storage::Database;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
struct CheckResult {
    name: &'static str,
    status: CheckStatus,
    message: String,
    duration: Duration,
}

/// Run the `wicket doctor` command.
pub async fn run_doctor(config: &WicketConfig) -> Result<(), WicketError> {
    let use_color = std::io::stdout().is_terminal();
    let results = vec![
        check_serve_config(config),
        check_database(&config.storage.database_path).await,
    ];

    println!();
    println!("  wicket doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    for result in &results {
        let duration_ms = result.duration.as_millis();
        let symbol = match result.status {
            CheckStatus::Pass => paint(use_color, "✓", "[OK]  "),
            CheckStatus::Warn => paint(use_color, "!", "[WARN]"),
            CheckStatus::Fail => {
                fail_count += 1;
                paint(use_color, "✗", "[FAIL]")
            }
        };
        println!(
            "    {symbol} {:<16} {} ({duration_ms}ms)",
            result.name, result.message
        );
    }
    println!();

    if fail_count > 0 {
        Err(WicketError::Config(format!("{fail_count} check(s) failed")))
    } else {
        Ok(())
    }
}

fn paint(use_color: bool, symbol: &str, plain: &str) -> String {
    if use_color {
        use colored::Colorize;
        match symbol {
            "✓" => symbol.green().to_string(),
            "!" => symbol.yellow().to_string(),
            _ => symbol.red().to_string(),
        }
    } else {
        plain.to_string()
    }
}

fn check_serve_config(config: &WicketConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match wicket_config::validate_for_serve(config) {
        Ok(()) => {
            if config.bot.staff_role_id.is_none() {
                (
                    CheckStatus::Warn,
                    "serve config valid; no staff role configured, only admins are staff"
                        .to_string(),
                )
            } else {
                (CheckStatus::Pass, "serve config valid".to_string())
            }
        }
        Err(errors) => (
            CheckStatus::Fail,
            format!("{} missing/invalid serve key(s)", errors.len()),
        ),
    };
    CheckResult {
        name: "config",
        status,
        message,
        duration: start.elapsed(),
    }
}

async fn check_database(path: &str) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match Database::open(path).await {
        Ok(db) => {
            let closed = db.close().await;
            match closed {
                Ok(()) => (CheckStatus::Pass, format!("opened {path}, migrations applied")),
                Err(e) => (CheckStatus::Warn, format!("opened but checkpoint failed: {e}")),
            }
        }
        Err(e) => (CheckStatus::Fail, format!("could not open {path}: {e}")),
    };
    CheckResult {
        name: "database",
        status,
        message,
        duration: start.elapsed(),
    }
}
