//! # Taskboard CLI
//!
//! One-shot batch commands over the task board database and the cats
//! collection. Nothing here listens on the network.
//!
//! ## Modules
//!
//! - `cli`: Command-line arguments
//! - `commands`: Subcommand implementations
//! - `report`: The query demonstration report
//! - `table`: Plain-text table rendering for the report
//! - `cats_demo`: The cats CRUD walkthrough
//! - `logging`: tracing subscriber setup

pub mod cats_demo;
pub mod cli;
pub mod commands;
pub mod logging;
pub mod report;
pub mod table;
