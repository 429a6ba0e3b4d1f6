use crate::error::ConfigurationError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment};
use serde::Deserialize;

/// Environment prefix read by [`GroupRunnerConfig::from_env`]
pub const ENV_PREFIX: &str = "GROUP_RUNNER";

/// Group runner settings.
///
/// Timeouts, retries and pool sizes are not configurable here; cancellation comes from the
/// caller's context and every unit gets its own task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GroupRunnerConfig {
    /// Label attached to every batch span
    pub name: String,
    /// Report a panicking unit as a failed slot instead of resuming the panic on the caller
    pub capture_panics: bool,
}

impl Default for GroupRunnerConfig {
    fn default() -> Self {
        Self {
            name: "group-runner".to_string(),
            capture_panics: true,
        }
    }
}

impl GroupRunnerConfig {
    /// Defaults overlaid with `GROUP_RUNNER_NAME` / `GROUP_RUNNER_CAPTURE_PANICS`
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_builder(
            Config::builder().add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .try_parsing(true),
            ),
        )
    }

    /// Builds from caller-assembled sources; unset keys keep their defaults
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigurationError> {
        let config = builder
            .build()
            .map_err(|e| ConfigurationError::Load(e.to_string()))?
            .try_deserialize::<Self>()
            .map_err(|e| ConfigurationError::Invalid(e.to_string()))?;

        if config.name.trim().is_empty() {
            return Err(ConfigurationError::Invalid(
                "name must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}
