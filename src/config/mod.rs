use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub session_duration_hours: i64,
    pub min_password_length: usize,
    /// Marks the session cookie `Secure`. Leave off for plain-http development.
    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory the local object storage writes into.
    pub root: String,
    /// URL prefix under which stored objects are served.
    pub public_path: String,
    pub max_upload_bytes: usize,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("database.url", "sqlite://tablon.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.session_duration_hours", 24 * 30)?
            .set_default("auth.min_password_length", 6)?
            .set_default("auth.secure_cookies", false)?
            .set_default("storage.root", "uploads")?
            .set_default("storage.public_path", "/uploads")?
            .set_default("storage.max_upload_bytes", 10 * 1024 * 1024)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with TABLON__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("TABLON").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://tablon.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                session_duration_hours: 24 * 30,
                min_password_length: 6,
                secure_cookies: false,
            },
            storage: StorageConfig {
                root: "uploads".to_string(),
                public_path: "/uploads".to_string(),
                max_upload_bytes: 10 * 1024 * 1024,
            },
        }
    }
}
