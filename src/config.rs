use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Gemini API settings shared by the analysis and summary clients
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_analysis_model")]
    pub analysis_model: String,
    #[serde(default)]
    pub analysis_temperature: f32,
    #[serde(default = "default_summary_model")]
    pub summary_model: String,
    pub summary_temperature: Option<f32>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl GeminiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_gemini_base_url(),
            analysis_model: default_analysis_model(),
            analysis_temperature: 0.0,
            summary_model: default_summary_model(),
            summary_temperature: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_analysis_model() -> String { "gemini-2.0-flash-exp".to_string() }
fn default_summary_model() -> String { "gemini-1.5-flash".to_string() }
fn default_timeout_secs() -> u64 { 30 }

/// Allowed browser origins; an empty list means any origin
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsSettings {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PM__)
    /// 5. `DATABASE_URL` and `GEMINI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let layered = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        apply_overrides(
            layered,
            std::env::var("DATABASE_URL").ok(),
            std::env::var("GEMINI_API_KEY").ok(),
        )?
        .try_deserialize()
    }
}

/// `PM__` prefixed variables, e.g. PM__SERVER__PORT -> server.port
///
/// `PM__CORS__ALLOWED_ORIGINS` is a comma separated list.
fn environment() -> Environment {
    Environment::with_prefix("PM")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
        .try_parsing(true)
}

/// Apply the conventional unprefixed variables on top of the layered config
fn apply_overrides(
    settings: Config,
    database_url: Option<String>,
    api_key: Option<String>,
) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Some(database_url) = database_url {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Some(api_key) = api_key {
        builder = builder.set_override("gemini.api_key", api_key)?;
    }

    builder.build()
}
