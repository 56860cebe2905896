/// MongoDB connection settings
///
/// # Environment Variables
///
/// - `MONGO_URI`: Connection string (default: mongodb://localhost:27017/)
/// - `MONGO_DB`: Database name (default: cats_db)
/// - `MONGO_COLLECTION`: Collection name (default: cats)
/// - `MONGO_SERVER_SELECTION_TIMEOUT_MS`: Server selection timeout (default: 5000)
///
/// Missing variables fall back to the defaults silently.

use crate::store::{CatResult, CatStoreError};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DATABASE: &str = "cats_db";
pub const DEFAULT_COLLECTION: &str = "cats";
pub const DEFAULT_SERVER_SELECTION_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub server_selection_timeout_ms: u64,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            server_selection_timeout_ms: DEFAULT_SERVER_SELECTION_TIMEOUT_MS,
        }
    }
}

impl MongoConfig {
    /// Loads configuration from environment variables (and `.env` if present)
    pub fn from_env() -> CatResult<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> CatResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_selection_timeout_ms = match non_empty("MONGO_SERVER_SELECTION_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                CatStoreError::Config(format!(
                    "MONGO_SERVER_SELECTION_TIMEOUT_MS must be a number of milliseconds: {raw}"
                ))
            })?,
            None => defaults.server_selection_timeout_ms,
        };

        Ok(Self {
            uri: non_empty("MONGO_URI").unwrap_or(defaults.uri),
            database: non_empty("MONGO_DB").unwrap_or(defaults.database),
            collection: non_empty("MONGO_COLLECTION").unwrap_or(defaults.collection),
            server_selection_timeout_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MongoConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, MongoConfig::default());
        assert_eq!(config.uri, "mongodb://localhost:27017/");
        assert_eq!(config.database, "cats_db");
        assert_eq!(config.collection, "cats");
        assert_eq!(config.server_selection_timeout_ms, 5000);
    }

    #[test]
    fn test_overrides() {
        let config = MongoConfig::from_lookup(|key| match key {
            "MONGO_URI" => Some("mongodb://mongo:27017/".to_string()),
            "MONGO_DB" => Some("pets".to_string()),
            "MONGO_SERVER_SELECTION_TIMEOUT_MS" => Some("250".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.uri, "mongodb://mongo:27017/");
        assert_eq!(config.database, "pets");
        assert_eq!(config.collection, "cats");
        assert_eq!(config.server_selection_timeout_ms, 250);
    }

    #[test]
    fn test_invalid_timeout() {
        let err = MongoConfig::from_lookup(|key| {
            (key == "MONGO_SERVER_SELECTION_TIMEOUT_MS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, CatStoreError::Config(_)));
    }
}
