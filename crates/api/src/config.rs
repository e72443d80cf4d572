//! Server configuration loaded from environment variables.

use crate::auth::jwt::JwtConfig;

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests on shutdown.
    #[allow(dead_code)]
    pub shutdown_timeout_secs: u64,
    /// JWT signing configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                | Default                 | Description                         |
    /// |-------------------------|-------------------------|-------------------------------------|
    /// | `HOST`                  | `0.0.0.0`               | Bind address                        |
    /// | `PORT`                  | `3000`                  | Listen port                         |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` | Comma-separated allowed origins     |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    | Per-request timeout                 |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    | Graceful-shutdown grace period      |
    ///
    /// JWT settings are loaded separately; see [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics if a variable is present but cannot be parsed, or if
    /// `JWT_SECRET` is missing.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
        }
    }
}
