/// Core `CatStore` trait and types
///
/// Every operation reports its outcome explicitly: lookups return `Option`,
/// updates return whether a document matched, deletes return how many
/// documents went away. Only store failures are errors.
///
/// Names are not unique. Operations "by name" act on the first matching
/// document in the store's natural order.

use async_trait::async_trait;
use mongodb::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store error types
#[derive(Debug, thiserror::Error)]
pub enum CatStoreError {
    /// Server unreachable or handshake failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Error reported by the MongoDB driver
    #[error("MongoDB error: {0}")]
    Driver(mongodb::error::Error),

    /// A stored document could not be decoded
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<mongodb::error::Error> for CatStoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::BsonDeserialization(e) => CatStoreError::InvalidDocument(e.to_string()),
            _ => CatStoreError::Driver(err),
        }
    }
}

/// Store result type alias
pub type CatResult<T> = Result<T, CatStoreError>;

/// A stored cat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cat {
    /// Store-assigned identity (hex ObjectId for MongoDB)
    pub id: String,

    pub name: String,

    pub age: i32,

    /// Free-text traits, in insertion order
    pub features: Vec<String>,
}

impl fmt::Display for Cat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (id {}, age {}): {}",
            self.name,
            self.id,
            self.age,
            self.features.join(", ")
        )
    }
}

/// Input for creating a cat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCat {
    pub name: String,
    pub age: i32,
    pub features: Vec<String>,
}

impl NewCat {
    pub fn new<I, S>(name: impl Into<String>, age: i32, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            age,
            features: features.into_iter().map(Into::into).collect(),
        }
    }
}

/// Name-keyed CRUD over a cat collection
#[async_trait]
pub trait CatStore: Send + Sync {
    /// Store backend name (for logs)
    fn name(&self) -> &str;

    /// Inserts a cat and returns its generated id
    async fn create(&self, cat: NewCat) -> CatResult<String>;

    /// Every cat in the collection
    async fn find_all(&self) -> CatResult<Vec<Cat>>;

    /// Number of cats in the collection
    async fn count(&self) -> CatResult<u64>;

    /// First cat with the given name
    async fn find_by_name(&self, name: &str) -> CatResult<Option<Cat>>;

    /// Sets the age of the first cat with the given name; false if none matched
    async fn update_age(&self, name: &str, age: i32) -> CatResult<bool>;

    /// Appends a feature to the first cat with the given name; false if none matched
    async fn add_feature(&self, name: &str, feature: &str) -> CatResult<bool>;

    /// Deletes the first cat with the given name; returns the deleted count (0 or 1)
    async fn delete_by_name(&self, name: &str) -> CatResult<u64>;

    /// Deletes every cat; returns the deleted count
    async fn delete_all(&self) -> CatResult<u64>;
}
