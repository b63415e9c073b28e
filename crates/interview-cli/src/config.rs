use config::{Config as ConfigLoader, ConfigError, Environment, File};
use interview_client::ClientConfig;
use interview_persist::PersistClient;
use serde::Deserialize;
use std::path::Path;

/// Environment variable holding the backend bearer token
pub const API_TOKEN_ENV: &str = "INTERVIEW_API_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub app: AppConfig,

    // Secret (from ENV only)
    #[serde(default)]
    pub api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    interview_client::config::DEFAULT_TIMEOUT_SECS
}

/// Web front end the session can be continued in
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Interview page, e.g. "https://jobs.example.com/interview"
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for file storage
    #[serde(default = "default_storage_dir")]
    pub directory: String,
}

fn default_storage_dir() -> String {
    ".golden-interview".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            directory: default_storage_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables, `<SECTION>__<KEY>` (e.g. API__BASE_URL, LOGGING__FORMAT)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(section_env("API"))
            .add_source(section_env("STORAGE"))
            .add_source(section_env("LOGGING"))
            .add_source(section_env("APP"));

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.api_token = std::env::var(API_TOKEN_ENV).map_err(|_| {
            ConfigError::Message(format!("{} environment variable is required", API_TOKEN_ENV))
        })?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api.base_url.clone())
            .with_api_token(self.api_token.clone())
            .with_timeout_secs(self.api.timeout_secs)
    }

    pub fn persist_client(&self) -> PersistClient {
        match self.storage.backend {
            StorageBackend::File => PersistClient::builder()
                .directory(&self.storage.directory)
                .build(),
            StorageBackend::Memory => PersistClient::builder().build(),
        }
    }
}

/// `API__BASE_URL` -> `api.base_url`
fn section_env(section: &str) -> Environment {
    Environment::with_prefix(section)
        .prefix_separator("__")
        .keep_prefix(true)
        .separator("__")
        .try_parsing(true)
}
