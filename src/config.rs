//! Configuration for the marketplace service.
//!
//! All settings come from environment variables (a `.env` file is honored).
//! The configuration is loaded once at startup and is immutable afterwards.

use std::path::PathBuf;
use std::str::FromStr;

use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Default allowed CORS origin.
pub const DEFAULT_FRONT_URL: &str = "http://localhost:3000";

/// Default upload limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// The single origin allowed to call the API from a browser.
    pub front_url: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// SQLite database file.
    pub database_path: String,
    /// JSON file used by the flat-file backend.
    pub items_json_path: PathBuf,
    /// Directory holding content-addressed `.jpg` files.
    pub image_dir: PathBuf,
    /// Served in place of images missing from `image_dir`.
    pub default_image: PathBuf,
    pub max_upload_size: usize,
}

/// Which catalog implementation persists items and categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Json,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Json => "json",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid {
                key: "STORAGE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 9000,
            },
            cors: CorsConfig {
                front_url: DEFAULT_FRONT_URL.into(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                database_path: "db/mercari.sqlite3".into(),
                items_json_path: PathBuf::from("items.json"),
                image_dir: PathBuf::from("images"),
                default_image: PathBuf::from("images/default.jpg"),
                max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            },
        }
    }
}

impl Config {
    /// Build a configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Unset or empty variables fall back to defaults.
    pub fn from_env<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(host) = get("HOST") {
            config.server.host = host;
        }
        if let Some(port) = get("PORT") {
            config.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: port })?;
        }
        if let Some(front_url) = get("FRONT_URL") {
            config.cors.front_url = front_url;
        }
        if let Some(backend) = get("STORAGE_BACKEND") {
            config.storage.backend = backend.parse()?;
        }
        if let Some(path) = get("DATABASE_PATH") {
            config.storage.database_path = path;
        }
        if let Some(path) = get("ITEMS_JSON_PATH") {
            config.storage.items_json_path = PathBuf::from(path);
        }
        if let Some(dir) = get("IMAGE_DIR") {
            config.storage.default_image = PathBuf::from(&dir).join("default.jpg");
            config.storage.image_dir = PathBuf::from(dir);
        }
        if let Some(path) = get("DEFAULT_IMAGE") {
            config.storage.default_image = PathBuf::from(path);
        }
        if let Some(size) = get("MAX_UPLOAD_SIZE") {
            config.storage.max_upload_size = size.trim().parse().map_err(|_| {
                ConfigError::Invalid {
                    key: "MAX_UPLOAD_SIZE",
                    value: size,
                }
            })?;
        }

        Ok(config)
    }
}

/// Load configuration from the environment and install it globally.
///
/// Subsequent calls return the already-installed configuration.
pub fn init() -> Result<&'static Config, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let _ = dotenvy::dotenv();
    let config = Config::load()?;
    Ok(CONFIG.get_or_init(|| config))
}
