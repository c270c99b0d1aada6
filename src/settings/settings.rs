use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub admin: Admin,
    pub log: Log,
    pub session: Session,
    pub store: Store,
    pub weather: Weather,
}

/// Operator credentials compared by equality. A demo-grade gate, kept
/// behind the authenticator port.
#[derive(Debug, Deserialize)]
pub struct Admin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub ttl_hours: i64,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    /// Path of the JSON store file; in-memory when absent.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Weather {
    pub base_url: String,
    pub api_key: String,
    pub units: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))
}
