/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `DATABASE_URL` (or `DB_URL`): PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET` (or `SECRET`): Session token signing key, at least 32 characters (required)
/// - `POLKA_KEY`: Webhook API key of the payment provider (required)
/// - `PLATFORM`: `dev` enables `/admin/reset` (default: prod)
/// - `FILESERVER_ROOT`: Directory served under `/app` (default: .)
/// - `CORS_ORIGINS`: Comma-separated origins, `*` for any (default: *)
/// - `RUST_LOG`, `LOG_FORMAT`: Logging filter and `json` output
///
/// # Example
///
/// ```no_run
/// use chirpy_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Minimum accepted length of the session token secret
pub const MIN_SECRET_LENGTH: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub polka: PolkaConfig,
}

/// Deployment platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Dev,
    Prod,
}

impl Platform {
    /// Anything other than `dev` is treated as production
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("dev") {
            Platform::Dev
        } else {
            Platform::Prod
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub platform: Platform,

    /// Directory served under `/app`
    pub fileserver_root: String,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for session token signing
    ///
    /// Generate with: `openssl rand -base64 64`
    pub secret: String,
}

/// Payment provider webhook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolkaConfig {
    /// Key the provider sends as `Authorization: ApiKey <key>`
    pub api_key: String,
}

/// First of `names` that is set
fn var_with_fallback(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env::var(name).ok())
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    /// - The JWT secret is shorter than 32 characters
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let platform = Platform::parse(&env::var("PLATFORM").unwrap_or_else(|_| "prod".to_string()));
        let fileserver_root = env::var("FILESERVER_ROOT").unwrap_or_else(|_| ".".to_string());
        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let database_url = var_with_fallback(&["DATABASE_URL", "DB_URL"])
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = var_with_fallback(&["JWT_SECRET", "SECRET"])
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < MIN_SECRET_LENGTH {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_SECRET_LENGTH);
        }

        let polka_key = env::var("POLKA_KEY")
            .map_err(|_| anyhow::anyhow!("POLKA_KEY environment variable is required"))?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                platform,
                fileserver_root,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            polka: PolkaConfig { api_key: polka_key },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn is_dev(&self) -> bool {
        self.api.platform == Platform::Dev
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
