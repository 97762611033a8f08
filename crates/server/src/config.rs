// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule file.
//!
//! The window boundaries live in an optional TOML file:
//!
//! ```toml
//! timezone = "America/Sao_Paulo"
//!
//! [morning]
//! label = "Morning"
//! signup_opens = "05:00"
//! signup_closes = "09:44"
//! draw_at = "09:45"
//! selection_opens = "09:45"
//! selection_closes = "11:44"
//!
//! [afternoon]
//! # same keys
//! ```
//!
//! An optional top-level `rules` array replaces the generated rules copy.

use roleta_api::{EngineConfig, WriterConfig};
use roleta_domain::{DomainError, PeriodSchedule, WindowPolicy, parse_clock_time};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading the schedule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read.
    Read {
        /// The path that was read.
        path: String,
        /// The I/O error message.
        message: String,
    },
    /// The file is not valid TOML for a schedule.
    Parse {
        /// The parser error message.
        message: String,
    },
    /// The schedule violates a window rule.
    Invalid(DomainError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "Failed to read schedule file '{path}': {message}")
            }
            Self::Parse { message } => write!(f, "Failed to parse schedule: {message}"),
            Self::Invalid(err) => write!(f, "Invalid schedule: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<DomainError> for ConfigError {
    fn from(err: DomainError) -> Self {
        Self::Invalid(err)
    }
}

/// Boundaries of one period, as written in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodConfig {
    pub label: String,
    pub signup_opens: String,
    pub signup_closes: String,
    pub draw_at: String,
    pub selection_opens: String,
    pub selection_closes: String,
}

/// The whole schedule file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// IANA time zone name.
    pub timezone: String,
    pub morning: PeriodConfig,
    pub afternoon: PeriodConfig,
    /// Replaces the generated rules copy when present.
    #[serde(default)]
    pub rules: Option<Vec<String>>,
}

impl PeriodConfig {
    fn to_schedule(&self) -> Result<PeriodSchedule, DomainError> {
        PeriodSchedule::new(
            self.label.clone(),
            parse_clock_time(&self.signup_opens)?,
            parse_clock_time(&self.signup_closes)?,
            parse_clock_time(&self.draw_at)?,
            parse_clock_time(&self.selection_opens)?,
            parse_clock_time(&self.selection_closes)?,
        )
    }
}

impl ScheduleConfig {
    /// Loads a schedule from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content: String = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parses a schedule from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid schedule document.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Validates the schedule into an engine configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a time is malformed, the time zone is unknown, or
    /// the boundaries are out of order.
    pub fn into_engine_config(self, writer: WriterConfig) -> Result<EngineConfig, ConfigError> {
        let policy: WindowPolicy = WindowPolicy::new(
            &self.timezone,
            self.morning.to_schedule()?,
            self.afternoon.to_schedule()?,
        )?;
        let mut config: EngineConfig = EngineConfig::new(policy);
        if let Some(rules) = self.rules {
            config.rules = rules;
        }
        config.writer = writer;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE: &str = r#"
timezone = "America/Sao_Paulo"

[morning]
label = "Manhã"
signup_opens = "06:00"
signup_closes = "08:59"
draw_at = "09:00"
selection_opens = "09:00"
selection_closes = "10:30"

[afternoon]
label = "Tarde"
signup_opens = "12:00"
signup_closes = "14:44"
draw_at = "14:45"
selection_opens = "14:45"
selection_closes = "17:44"
"#;

    #[test]
    fn test_schedule_file_builds_policy() {
        let config = ScheduleConfig::parse(SCHEDULE)
            .unwrap()
            .into_engine_config(WriterConfig::default())
            .unwrap();

        let morning = config.policy.schedule(roleta_domain::Period::Morning);
        assert_eq!(morning.label(), "Manhã");
        assert_eq!(morning.draw_at().format("%H:%M").to_string(), "09:00");
        assert!(config.rules.iter().any(|r| r.contains("Manhã")));
    }

    #[test]
    fn test_custom_rules_replace_generated_copy() {
        let text = format!("rules = [\"Be nice.\"]\n{SCHEDULE}");

        let config = ScheduleConfig::parse(&text)
            .unwrap()
            .into_engine_config(WriterConfig::default())
            .unwrap();

        assert_eq!(config.rules, vec![String::from("Be nice.")]);
    }

    #[test]
    fn test_out_of_order_schedule_is_rejected() {
        let text = SCHEDULE.replace("draw_at = \"09:00\"", "draw_at = \"08:00\"");

        let result = ScheduleConfig::parse(&text)
            .unwrap()
            .into_engine_config(WriterConfig::default());

        assert!(matches!(
            result,
            Err(ConfigError::Invalid(DomainError::InvalidSchedule { .. }))
        ));
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let text = SCHEDULE.replace("America/Sao_Paulo", "Mars/Olympus");

        let result = ScheduleConfig::parse(&text)
            .unwrap()
            .into_engine_config(WriterConfig::default());

        assert!(matches!(
            result,
            Err(ConfigError::Invalid(DomainError::InvalidTimezone(_)))
        ));
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let result = ScheduleConfig::parse("timezone = 3");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
