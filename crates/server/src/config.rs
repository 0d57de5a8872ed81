//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults run a self-contained local shop.
//!
//! - `WEBSHOP_DATABASE_URL` - SQLite connection string
//!   (default: `sqlite:data/webshop.db`; falls back to `DATABASE_URL`)
//! - `WEBSHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `WEBSHOP_PORT` - Listen port (default: 3000)
//! - `WEBSHOP_PUBLIC_DIR` - Static file directory (default: public)
//! - `WEBSHOP_ALLOWED_ORIGINS` - Comma-separated CORS origins
//!   (default: `http://localhost:3000,http://localhost:5500`)

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Default database location, relative to the working directory.
const DEFAULT_DATABASE_URL: &str = "sqlite:data/webshop.db";

/// Origins the browser pages are served from during local development.
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5500";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Webshop application configuration.
#[derive(Debug, Clone)]
pub struct WebshopConfig {
    /// SQLite database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory of static browser pages served as the router fallback
    pub public_dir: PathBuf,
    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<String>,
}

impl WebshopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url();
        let host = get_env_or_default("WEBSHOP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WEBSHOP_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("WEBSHOP_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WEBSHOP_PORT".to_owned(), e.to_string()))?;
        let public_dir = PathBuf::from(get_env_or_default("WEBSHOP_PUBLIC_DIR", "public"));
        let allowed_origins = parse_origins(&get_env_or_default(
            "WEBSHOP_ALLOWED_ORIGINS",
            DEFAULT_ALLOWED_ORIGINS,
        ));

        Ok(Self {
            database_url,
            host,
            port,
            public_dir,
            allowed_origins,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Filesystem path of the SQLite database, if the URL points at a file.
    ///
    /// In-memory databases and `file:` URIs return `None`.
    #[must_use]
    pub fn database_file(&self) -> Option<PathBuf> {
        let url = self.database_url.expose_secret();
        let rest = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        let rest = rest.split('?').next().unwrap_or(rest);
        if rest.is_empty() || rest == ":memory:" || rest.starts_with("file:") {
            return None;
        }
        Some(PathBuf::from(rest))
    }

    /// Directory that must exist before the database file can be created.
    #[must_use]
    pub fn database_parent_dir(&self) -> Option<PathBuf> {
        self.database_file()
            .and_then(|path| path.parent().map(Path::to_path_buf))
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url() -> SecretString {
    if let Ok(value) = std::env::var("WEBSHOP_DATABASE_URL") {
        return SecretString::from(value);
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return SecretString::from(value);
    }
    SecretString::from(DEFAULT_DATABASE_URL)
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Split a comma-separated origin list, dropping empty entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config(database_url: &str) -> WebshopConfig {
        WebshopConfig {
            database_url: SecretString::from(database_url),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            public_dir: PathBuf::from("public"),
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config("sqlite:data/webshop.db");
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_database_file_plain() {
        let config = test_config("sqlite:data/webshop.db");
        assert_eq!(config.database_file(), Some(PathBuf::from("data/webshop.db")));
        assert_eq!(config.database_parent_dir(), Some(PathBuf::from("data")));
    }

    #[test]
    fn test_database_file_double_slash_scheme() {
        let config = test_config("sqlite://data/webshop.db");
        assert_eq!(config.database_file(), Some(PathBuf::from("data/webshop.db")));
    }

    #[test]
    fn test_database_file_strips_query() {
        let config = test_config("sqlite:data/webshop.db?mode=rwc");
        assert_eq!(config.database_file(), Some(PathBuf::from("data/webshop.db")));
    }

    #[test]
    fn test_database_file_memory() {
        let config = test_config("sqlite::memory:");
        assert_eq!(config.database_file(), None);
        assert_eq!(config.database_parent_dir(), None);
    }

    #[test]
    fn test_database_parent_dir_bare_filename() {
        let config = test_config("sqlite:webshop.db");
        assert_eq!(config.database_file(), Some(PathBuf::from("webshop.db")));
        assert_eq!(config.database_parent_dir(), None);
    }

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("http://a.test, http://b.test ,,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }
}
