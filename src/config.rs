//! Runtime configuration read from the environment
//!
//! # Environment Variables
//!
//! - `PORT` - Server port number (default: 8000)
//! - `DATABASE_URL` - Path to the redb database file (default: "data.db")
//! - `BASE_URL` - Prefix of generated short links (default: `http://localhost:{PORT}`)
//! - `CLIENT_DIR` - Directory holding the built client application (default: "client/build")

use std::env;
use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE_PATH: &str = "data.db";
pub const DEFAULT_CLIENT_DIR: &str = "client/build";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub base_url: String,
    pub client_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, default = DEFAULT_PORT, "invalid PORT, using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let database_path =
            non_empty("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let base_url = non_empty("BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        let client_dir = non_empty("CLIENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CLIENT_DIR));

        Self {
            port,
            database_path,
            base_url,
            client_dir,
        }
    }
}
