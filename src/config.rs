//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;
use std::path::PathBuf;

/// Which backing store holds the `keys` and `checkoutLogs` blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local, lost on restart
    Memory,
    /// One JSON file per blob under `DATA_DIR`
    File,
    /// `kv_blobs` table in PostgreSQL at `DATABASE_URL`
    Postgres,
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `STORE_BACKEND` (optional): `memory`, `file` or `postgres`, defaults to `file`
/// - `DATA_DIR` (optional): directory for the file backend, defaults to `./data`
/// - `DATABASE_URL` (required for `postgres`): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_backend")]
    pub store_backend: StoreBackend,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,
}

fn default_backend() -> StoreBackend {
    StoreBackend::File
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into expected types.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: data_dir -> DATA_DIR
        envy::from_env::<Config>()
    }

    /// Same as [`Config::from_env`] but over an explicit variable list.
    #[cfg(test)]
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
