use std::env;
use std::path::PathBuf;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub admin: AdminConfig,
    pub seed: SeedConfig,
    pub uploads: UploadsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub bcrypt_cost: u32,
}

/// Administrator account created on first boot.
#[derive(Deserialize, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Comma-separated category names
    pub categories: String,
}

impl SeedConfig {
    /// Trimmed, non-empty category names in configuration order.
    pub fn category_names(&self) -> Vec<&str> {
        self.categories
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub directory: PathBuf,
    pub max_request_bytes: usize,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults for seeding and uploads
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_hours", 24)?
            .set_default("password.bcrypt_cost", auth::PasswordHasher::DEFAULT_COST)?
            .set_default("admin.username", "admin")?
            .set_default("admin.password", "ChangeMe123!")?
            .set_default("seed.categories", "")?
            .set_default("uploads.directory", "uploads")?
            .set_default("uploads.max_request_bytes", 10 * 1024 * 1024)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}
