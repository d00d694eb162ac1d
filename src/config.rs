use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `production` switches cookies to `Secure; SameSite=None` and hides
    /// error causes from responses.
    pub environment: String,
    /// Browser application the OAuth flow redirects back to.
    pub client_url: String,
    /// Public address of this server, used to build the OAuth callback URL.
    pub public_url: String,
    /// Root directory of the personal directories served under `/index`.
    pub index_dir: String,
}

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_days: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GithubConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl GithubConfig {
    /// Client id and secret when both are set and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let id = self.client_id.as_deref().filter(|v| !v.is_empty())?;
        let secret = self.client_secret.as_deref().filter(|v| !v.is_empty())?;

        Some((id, secret))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (DATABASE_URL, JWT_SECRET, PORT, ...)
    /// 2. Prefixed environment variables (PEERSTAKE__DATABASE__URL, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.environment", "development")?
            .set_default("server.client_url", "http://localhost:5173")?
            .set_default("server.public_url", "http://localhost:5000")?
            .set_default("server.index_dir", "index")?
            .set_default("database.url", "sqlite:peerstake.db")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_days", 30)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("PEERSTAKE")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in [
            ("DATABASE_URL", "database.url"),
            ("JWT_SECRET", "jwt.secret"),
            ("GITHUB_CLIENT_ID", "github.client_id"),
            ("GITHUB_CLIENT_SECRET", "github.client_secret"),
            ("CLIENT_URL", "server.client_url"),
            ("SERVER_URL", "server.public_url"),
            ("ENVIRONMENT", "server.environment"),
            ("PORT", "server.port"),
        ] {
            if let Ok(value) = env::var(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }
        if !(1..=365).contains(&self.jwt.expiration_days) {
            return Err("JWT expiration_days must be between 1 and 365".to_string());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if url::Url::parse(&self.server.client_url).is_err() {
            return Err("Server client_url must be an absolute URL".to_string());
        }
        if url::Url::parse(&self.server.public_url).is_err() {
            return Err("Server public_url must be an absolute URL".to_string());
        }
        Ok(())
    }

    /// Redirect URI registered with GitHub.
    pub fn github_callback_url(&self) -> String {
        format!(
            "{}/api/auth/github/callback",
            self.server.public_url.trim_end_matches('/')
        )
    }

    /// Absolute URL of a page of the browser application.
    pub fn client_page(&self, path: &str) -> String {
        format!("{}{}", self.server.client_url.trim_end_matches('/'), path)
    }
}
