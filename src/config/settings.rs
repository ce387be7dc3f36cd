//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Log output configuration
    pub logging: LoggingSettings,

    /// Scoring model weight tables
    pub models: ModelSettings,

    /// Retry rules applied by operation name
    pub retry: RetrySettings,

    /// Listing lifecycle thresholds
    pub policies: PolicySettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

/// Model weight table configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    /// Directory holding `<model>.json` weight files
    pub directory: String,
}

/// A single retry rule: operations matching `pattern` use this policy.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryRuleSettings {
    /// Operation name pattern (`name`, `prefix.*` or `*`)
    pub pattern: String,

    /// Total attempts including the first one
    pub max_attempts: u32,

    /// Delay after the first failed attempt, in milliseconds
    pub initial_delay_ms: u64,

    /// Growth factor applied per failed attempt
    pub multiplier: f64,

    /// Upper bound for a single delay, in milliseconds
    #[serde(default)]
    pub max_delay_ms: Option<u64>,
}

/// Retry configuration. Rules are matched in order, first match wins.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    pub rules: Vec<RetryRuleSettings>,
}

/// Listing lifecycle thresholds, all day counts.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicySettings {
    /// Minimum number of photos before a listing can go live
    pub min_photos: u32,

    /// Listings younger than this may be featured
    pub featured_max_days: i64,

    /// Active listings untouched this long are stale
    pub stale_after_days: i64,

    /// Active listings on market this long expire
    pub expire_after_days: i64,

    /// Closed listings untouched this long can be archived
    pub archive_after_days: i64,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if a retry rule or policy threshold is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Self::builder(&environment)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("models.directory", std::env::var("MODELS_DIR").ok())?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    /// Settings built from defaults only. Used by tests and tooling.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder("test")?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    fn builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("environment", environment)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("logging.json", false)?
            .set_default("models.directory", "models")?
            .set_default("policies.min_photos", 5)?
            .set_default("policies.featured_max_days", 14)?
            .set_default("policies.stale_after_days", 30)?
            .set_default("policies.expire_after_days", 180)?
            .set_default("policies.archive_after_days", 90)?
            .set_default("retry.rules", default_retry_rules())
    }

    fn validate(settings: Self) -> Result<Self, ConfigError> {
        for rule in &settings.retry.rules {
            if rule.max_attempts == 0 {
                return Err(ConfigError::Message(format!(
                    "retry rule '{}' must allow at least one attempt",
                    rule.pattern
                )));
            }
            if rule.multiplier < 1.0 {
                return Err(ConfigError::Message(format!(
                    "retry rule '{}' has multiplier {} below 1.0",
                    rule.pattern, rule.multiplier
                )));
            }
        }

        let p = &settings.policies;
        if p.featured_max_days < 0
            || p.stale_after_days < 0
            || p.expire_after_days < 0
            || p.archive_after_days < 0
        {
            return Err(ConfigError::Message(
                "policy day thresholds must not be negative".into(),
            ));
        }

        Ok(settings)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Model loading is the only I/O on the request path, so it is the only
/// operation family retried out of the box.
fn default_retry_rules() -> config::Value {
    let mut rule = config::Map::new();
    rule.insert("pattern".to_string(), config::Value::from("models.*"));
    rule.insert("max_attempts".to_string(), config::Value::from(3_i64));
    rule.insert("initial_delay_ms".to_string(), config::Value::from(100_i64));
    rule.insert("multiplier".to_string(), config::Value::from(2.0_f64));
    rule.insert("max_delay_ms".to_string(), config::Value::from(2000_i64));
    config::Value::from(vec![config::Value::from(rule)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load() {
        let settings = Settings::defaults().unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.policies.min_photos, 5);
        assert_eq!(settings.retry.rules.len(), 1);
        assert_eq!(settings.retry.rules[0].pattern, "models.*");
        assert_eq!(settings.retry.rules[0].max_delay_ms, Some(2000));
    }

    #[test]
    fn test_zero_attempt_rule_rejected() {
        let mut settings = Settings::defaults().unwrap();
        settings.retry.rules[0].max_attempts = 0;
        assert!(Settings::validate(settings).is_err());
    }

    #[test]
    fn test_shrinking_multiplier_rejected() {
        let mut settings = Settings::defaults().unwrap();
        settings.retry.rules[0].multiplier = 0.5;
        assert!(Settings::validate(settings).is_err());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut settings = Settings::defaults().unwrap();
        settings.policies.stale_after_days = -1;
        assert!(Settings::validate(settings).is_err());
    }
}
