//! Merger configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::MergeError;
use crate::key::EXIT_SUFFIX;

/// Configuration for the visitor merger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    /// Suffix that marks a visit-key as an exit key.
    ///
    /// Handlers under exit keys run last-to-first. Default: `":exit"`.
    #[serde(default = "default_exit_suffix")]
    pub exit_suffix: String,
}

fn default_exit_suffix() -> String {
    EXIT_SUFFIX.to_string()
}

impl MergeConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self {
            exit_suffix: default_exit_suffix(),
        }
    }

    /// Sets the exit suffix.
    pub fn with_exit_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exit_suffix = suffix.into();
        self
    }

    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MergeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| MergeError::config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_json(&content)?;
        debug!("Loaded merge config from {}", path.display());

        Ok(config)
    }

    /// Parses and validates configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, MergeError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| MergeError::config(format!("Invalid JSON: {}", e)))?;

        let config: Self = serde_json::from_value(value)
            .map_err(|e| MergeError::config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can be used for merging.
    pub fn validate(&self) -> Result<(), MergeError> {
        if self.exit_suffix.is_empty() {
            // Every key would end with "", turning all handlers into exit handlers.
            return Err(MergeError::config("exit_suffix must not be empty"));
        }
        Ok(())
    }

    /// Returns true if `key` is an exit key under this configuration.
    #[inline]
    pub fn is_exit_key(&self, key: &str) -> bool {
        key.ends_with(self.exit_suffix.as_str())
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_new() {
        let config = MergeConfig::new();
        assert_eq!(config.exit_suffix, ":exit");
        assert_eq!(config, MergeConfig::default());
    }

    #[test]
    fn test_config_from_json() {
        let config = MergeConfig::from_json(r#"{ "exit_suffix": ":leave" }"#).unwrap();
        assert_eq!(config.exit_suffix, ":leave");
        assert!(config.is_exit_key("Identifier:leave"));
        assert!(!config.is_exit_key("Identifier:exit"));
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let config = MergeConfig::from_json("{}").unwrap();
        assert_eq!(config, MergeConfig::new());
    }

    #[rstest]
    #[case::malformed("{ exit_suffix: }", "Invalid JSON")]
    #[case::unknown_property(r#"{ "exitSuffix": ":exit" }"#, "Invalid config: unknown field")]
    #[case::type_mismatch(r#"{ "exit_suffix": 1 }"#, "Invalid config: invalid type")]
    #[case::empty_suffix(r#"{ "exit_suffix": "" }"#, "must not be empty")]
    fn test_config_from_json_errors(#[case] json: &str, #[case] expected_error_part: &str) {
        let err = MergeConfig::from_json(json).unwrap_err();
        assert!(matches!(err, MergeError::Config(_)));
        assert!(
            err.to_string().contains(expected_error_part),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "exit_suffix": ":after" }}"#).unwrap();

        let config = MergeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.exit_suffix, ":after");
    }

    #[test]
    fn test_config_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MergeConfig::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_config_serialization() {
        let json = serde_json::to_string(&MergeConfig::new()).unwrap();
        assert_eq!(json, r#"{"exit_suffix":":exit"}"#);
    }
}
