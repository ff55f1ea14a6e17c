// src/internal/config/config.rs

use config::{Config, ConfigError, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::internal::router::DEFAULT_CATEGORY;

// Version information from build script - using option_env! for safety
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix for environment overrides, e.g. `TG_LOG_LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "TG_LOG";

/// Get version information
pub fn get_version_info() -> String {
    let build_timestamp = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown");
    let build_date = option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown");
    let rustc_semver = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown");
    let cargo_target_triple = option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown");

    format!(
        "tg-log version {}\n\
         Built: {} ({})\n\
         Rust: {}\n\
         Target: {}",
        VERSION, build_date, build_timestamp, rustc_semver, cargo_target_triple
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub append_to_file: bool,
    #[serde(default)]
    pub disable_console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            color: true,
            output_path: None,
            append_to_file: false,
            disable_console: false,
        }
    }
}

/// Settings for the router and the debug capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacadeConfig {
    /// Category the structured event recorder is bound to.
    #[serde(default = "default_category")]
    pub category: String,
    /// Channel name of the tracing-backed general logger.
    #[serde(default = "default_general_channel")]
    pub general_channel: String,
    /// Channel name of the tracing-backed update logger.
    #[serde(default = "default_update_channel")]
    pub update_channel: String,
    #[serde(default = "default_true")]
    pub remove_bot_token: bool,
    /// Log captured request/response traces for successful requests too.
    #[serde(default)]
    pub always_log_request_and_response: bool,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            category: default_category(),
            general_channel: default_general_channel(),
            update_channel: default_update_channel(),
            remove_bot_token: true,
            always_log_request_and_response: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "compact".to_string()
}
fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}
fn default_general_channel() -> String {
    "bot".to_string()
}
fn default_update_channel() -> String {
    "update".to_string()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub facade: FacadeConfig,
}

impl AppConfig {
    /// Load defaults, `./tg-log.*` and `TG_LOG_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], with an explicit file layered on top of
    /// `./tg-log.*`. The explicit file must exist.
    pub fn load_from(path: Option<&str>) -> Result<Self, ConfigError> {
        Self::build(path, None)
    }

    fn build(path: Option<&str>, env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.format", "compact")?
            .set_default("logging.color", true)?
            .set_default("facade.category", DEFAULT_CATEGORY)?
            .set_default("facade.remove_bot_token", true)?
            .set_default("facade.always_log_request_and_response", false)?
            .add_source(File::with_name("tg-log").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(Path::new(path)).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;

        if app_config.facade.category.trim().is_empty() {
            return Err(ConfigError::Message(
                "facade.category must not be empty".to_string(),
            ));
        }

        Ok(app_config)
    }

    pub fn load_from_args(matches: &clap::ArgMatches) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(matches.get_one::<String>("config").map(String::as_str))?;

        // Override with CLI args if provided
        if let Some(level) = matches.get_one::<String>("log-level") {
            config.logging.level = level.clone();
        }

        if matches.get_flag("no-color") {
            config.logging.color = false;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn yaml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write temp file");
        file
    }

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::build(None, env(&[])).unwrap();

        assert_eq!(config.logging.level, "info");
        assert!(config.logging.color);
        assert_eq!(config.facade.category, "tdlib");
        assert_eq!(config.facade.update_channel, "update");
        assert!(config.facade.remove_bot_token);
        assert!(!config.facade.always_log_request_and_response);
    }

    #[test]
    fn test_yaml_file() {
        let file = yaml_file(
            r#"
logging:
  level: debug
  color: false
facade:
  category: mybot
  remove_bot_token: false
  always_log_request_and_response: true
"#,
        );

        let path = file.path().to_str().unwrap();
        let config = AppConfig::build(Some(path), env(&[])).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.color);
        assert_eq!(config.facade.category, "mybot");
        assert!(!config.facade.remove_bot_token);
        assert!(config.facade.always_log_request_and_response);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = yaml_file("facade:\n  category: fromfile\n");
        let path = file.path().to_str().unwrap();

        let config = AppConfig::build(
            Some(path),
            env(&[
                ("TG_LOG_FACADE__CATEGORY", "fromenv"),
                ("TG_LOG_FACADE__REMOVE_BOT_TOKEN", "false"),
            ]),
        )
        .unwrap();

        assert_eq!(config.facade.category, "fromenv");
        assert!(!config.facade.remove_bot_token);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(AppConfig::build(Some("/nonexistent/tg-log.yaml"), env(&[])).is_err());
    }

    #[test]
    fn test_empty_category_is_rejected() {
        let file = yaml_file("facade:\n  category: \"  \"\n");
        let path = file.path().to_str().unwrap();

        assert!(AppConfig::build(Some(path), env(&[])).is_err());
    }

    #[test]
    fn test_version_info_names_the_crate() {
        assert!(get_version_info().starts_with("tg-log version"));
    }
}
