//! Application configuration management.

use serde::Deserialize;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "LEDGERVIEW";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Viewer configuration.
    #[serde(default)]
    pub viewer: ViewerConfig,
}

/// Viewer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    /// Spaces of indentation per hierarchy level.
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
    /// Report used when none is named on the command line.
    #[serde(default = "default_report")]
    pub default_report: String,
    /// Overrides the report's own initial depth when set.
    #[serde(default)]
    pub initial_depth: Option<i64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            default_report: default_report(),
            initial_depth: None,
        }
    }
}

fn default_indent_width() -> usize {
    2
}

fn default_report() -> String {
    "Financial Accounting Reports".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
