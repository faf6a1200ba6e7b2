use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub server: ServerConfig,
    pub app: AppConfig,
    #[serde(default)]
    pub tokens: TokenConfig,
    pub mail: MailConfig,
    #[serde(default = "default_environment")]
    pub environment: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Base URL of the web client; confirmation and password-reset
    /// links are built on top of it.
    pub client_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    /// Lifetime of confirmation and reset tokens, in seconds.
    #[serde(default = "default_token_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

// Confirmation/reset links stay valid for a day.
fn default_token_ttl_seconds() -> u64 {
    24 * 60 * 60
}

fn default_environment() -> String {
    "development".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"))
            .set_override("environment", run_mode)?
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Production mode turns on the session cookie `Secure` flag.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
