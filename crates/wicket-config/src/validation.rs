// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Collects every failure instead of stopping at the first.

use crate::diagnostic::ConfigError;
use crate::model::WicketConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &WicketConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.tickets.staff_add_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "tickets.staff_add_limit must be at least 1".to_string(),
        });
    }

    if config.tickets.add_pace_ms > 10_000 {
        errors.push(ConfigError::Validation {
            message: format!(
                "tickets.add_pace_ms must be at most 10000, got {}",
                config.tickets.add_pace_ms
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level must be one of {LOG_LEVELS:?}, got `{}`",
                config.log.level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the additional keys `serve` requires: a bot token and the
/// operating guild.
pub fn validate_for_serve(config: &WicketConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.bot.token.as_deref().map(str::trim).unwrap_or("").is_empty() {
        errors.push(ConfigError::MissingKey {
            key: "bot.token".to_string(),
        });
    }

    if config.bot.guild_id.is_none() {
        errors.push(ConfigError::MissingKey {
            key: "bot.guild_id".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let config = WicketConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_staff_add_limit_is_rejected() {
        let mut config = WicketConfig::default();
        config.tickets.staff_add_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("staff_add_limit"));
    }

    #[test]
    fn bogus_log_level_is_rejected() {
        let mut config = WicketConfig::default();
        config.log.level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn all_failures_are_collected() {
        let mut config = WicketConfig::default();
        config.tickets.staff_add_limit = 0;
        config.storage.database_path = " ".to_string();
        config.log.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn serve_requires_token_and_guild() {
        let config = WicketConfig::default();
        let errors = validate_for_serve(&config).unwrap_err();
        assert_eq!(errors.len(), 2);

        let mut config = WicketConfig::default();
        config.bot.token = Some("t0ken".to_string());
        config.bot.guild_id = Some(42);
        assert!(validate_for_serve(&config).is_ok());
    }
}
