use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub generation: GenerationConfig,
    pub dispatch: DispatchConfig,
    pub agency: AgencyConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Path of the single JSON slot the inquiry database lives in.
    pub path: String,
}

/// Settings for the text-generation service that drafts the email brief.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    #[serde(default = "default_generation_timeout")]
    pub timeout_seconds: u64,
}

fn default_generation_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_generation_timeout() -> u64 {
    30
}

/// The background endpoint the submission payload is posted to.
#[derive(Debug, Deserialize, Clone)]
pub struct DispatchConfig {
    pub endpoint: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Agency contact details surfaced in briefs, handoffs and soft-failure
/// messages.
#[derive(Debug, Deserialize, Clone)]
pub struct AgencyConfig {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub admin_username: String,
    pub admin_password: String,
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Base configuration checked into the repo
            .add_source(config::File::with_name("config/default"))
            // Environment-specific overrides (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Machine-local overrides, not checked in (optional)
            .add_source(config::File::with_name("config/local").required(false))
            // Environment variables: HORN__SERVER__PORT etc.
            .add_source(config::Environment::with_prefix("HORN").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
