//! API configuration

use serde::Deserialize;

use core_kernel::{CoreError, Timezone};
use domain_dunning::ReminderStepPolicy;

/// API configuration
///
/// Every field has a default, so a partial environment is enough.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Organization timezone used when a request carries none
    pub timezone: Timezone,
    /// Policy applied when a request carries none
    pub default_policy: ReminderStepPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            timezone: Timezone::default(),
            default_policy: ReminderStepPolicy::standard(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `DUNNING_`-prefixed environment variables
    ///
    /// `DUNNING_PORT=9000 DUNNING_TIMEZONE=Europe/Paris`. Nested keys use a
    /// double underscore. A `default_policy` given through the environment
    /// replaces the built-in one as a whole, so it must list its `steps`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(None)
    }

    fn from_environment(
        vars: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("DUNNING")
                    .prefix_separator("_")
                    .separator("__")
                    .source(vars),
            )
            .build()?
            .try_deserialize()
    }

    /// Rejects a default policy that would make the scheduler silently idle
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.default_policy.is_well_formed() {
            return Err(CoreError::configuration(
                "default_policy: step delays must be strictly increasing, at most 4 steps",
            ));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
