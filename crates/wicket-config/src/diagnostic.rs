// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Miette diagnostics for configuration failures.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic metadata for miette rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Figment could not parse or merge the configuration sources.
    #[error("configuration parse error: {message}")]
    #[diagnostic(
        code(wicket::config::parse),
        help("check wicket.toml against the documented keys; unknown keys are rejected")
    )]
    Parse {
        /// Figment's own description of the failure.
        message: String,
    },

    /// A key required for the requested command is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(wicket::config::missing_key),
        help("add `{key} = <value>` to your wicket.toml or set the matching WICKET_* variable")
    )]
    MissingKey {
        /// The missing key name, in `section.key` form.
        key: String,
    },

    /// A semantic constraint on a config value failed.
    #[error("validation error: {message}")]
    #[diagnostic(code(wicket::config::validation))]
    Validation { message: String },
}

/// Render collected configuration errors to stderr via miette's graphical
/// report handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for err in errors {
        let mut out = String::new();
        if handler.render_report(&mut out, err).is_ok() {
            eprintln!("{out}");
        } else {
            eprintln!("error: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_names_the_key() {
        let err = ConfigError::MissingKey {
            key: "bot.token".into(),
        };
        assert!(err.to_string().contains("bot.token"));
    }

    #[test]
    fn render_does_not_panic() {
        render_errors(&[
            ConfigError::Parse {
                message: "unknown field `tokn`".into(),
            },
            ConfigError::Validation {
                message: "tickets.staff_add_limit must be at least 1".into(),
            },
        ]);
    }
}
