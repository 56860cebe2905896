//! # Taskboard Shared Library
//!
//! This crate contains the relational side of Taskboard: configuration, the
//! PostgreSQL pool and schema manager, the row models, the query catalog and
//! the synthetic data seeder.
//!
//! ## Module Organization
//!
//! - `config`: Connection settings loaded from environment variables
//! - `error`: Common error type
//! - `db`: Connection pool and schema initialization/teardown
//! - `models`: Row types for users, statuses and tasks
//! - `queries`: The fixed catalog of parameterized queries
//! - `seed`: Fake user/task generation

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod queries;
pub mod seed;

pub use error::{Error, Result};

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
