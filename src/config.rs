//! Tutor configuration.

use crate::lessons::LessonId;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Board layout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Variant {
    /// One board, strict alternation.
    #[default]
    Single,
    /// Four boards sharing one opponent cycle.
    Quad,
}

impl Variant {
    /// Number of boards in this layout.
    pub fn board_count(self) -> usize {
        match self {
            Variant::Single => 1,
            Variant::Quad => 4,
        }
    }
}

/// Settings for one tutoring session. Every field has a default.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct TutorConfig {
    /// Board layout.
    variant: Variant,

    /// Loop iterations allowed per run, across all boards.
    iteration_cap: u32,

    /// Pause after every board mutation, in milliseconds.
    settle_delay_ms: u64,

    /// Pause between a passed lesson and the advance prompt, in milliseconds.
    advance_delay_ms: u64,

    /// Lesson to start at.
    start_lesson: LessonId,

    /// Seed for every random decision; entropy when absent.
    #[setters(strip_option)]
    seed: Option<u64>,

    /// Use the mirror opponent for the final lesson on quad boards.
    mirror_final_lesson: bool,

    /// Restart a failed lesson automatically.
    auto_retry: bool,

    /// Password for the secrets panel.
    #[setters(into)]
    secrets_password: String,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Single,
            iteration_cap: 1000,
            settle_delay_ms: 300,
            advance_delay_ms: 1000,
            start_lesson: LessonId::FIRST,
            seed: None,
            mirror_final_lesson: true,
            auto_retry: false,
            secrets_password: "blockly".to_string(),
        }
    }
}

impl TutorConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(variant = %config.variant, lesson = %config.start_lesson, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.iteration_cap == 0 {
            return Err(ConfigError::new("iteration_cap must be at least 1"));
        }
        Ok(())
    }

    /// Settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Advance delay as a duration.
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TutorConfig::default();
        assert_eq!(*config.iteration_cap(), 1000);
        assert_eq!(config.settle_delay(), Duration::from_millis(300));
        assert_eq!(config.secrets_password(), "blockly");
        assert_eq!(config.variant().board_count(), 1);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TutorConfig::from_toml(
            r#"
            variant = "quad"
            start_lesson = 4
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(*config.variant(), Variant::Quad);
        assert_eq!(config.start_lesson().number(), 4);
        assert_eq!(*config.seed(), Some(42));
        assert!(*config.mirror_final_lesson());
        assert_eq!(*config.advance_delay_ms(), 1000);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(TutorConfig::from_toml("start_lesson = 9").is_err());
        assert!(TutorConfig::from_toml("iteration_cap = 0").is_err());
        assert!(TutorConfig::from_toml("variant = \"hex\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "auto_retry = true\nsettle_delay_ms = 0").unwrap();
        let config = TutorConfig::from_file(file.path()).unwrap();
        assert!(*config.auto_retry());
        assert_eq!(config.settle_delay(), Duration::ZERO);

        let err = TutorConfig::from_file("/nonexistent/tutor.toml").unwrap_err();
        assert!(err.message.contains("Failed to read"));
    }

    #[test]
    fn test_builder_setters() {
        let config = TutorConfig::default()
            .with_variant(Variant::Quad)
            .with_seed(9)
            .with_secrets_password("open sesame");
        assert_eq!(*config.seed(), Some(9));
        assert_eq!(config.secrets_password(), "open sesame");
    }
}
