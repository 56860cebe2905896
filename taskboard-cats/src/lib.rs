//! # Taskboard Cats
//!
//! Name-keyed CRUD over a document collection of cats. Unrelated to the task
//! board tables; it only shares the workspace and the CLI.
//!
//! ## Modules
//!
//! - `store`: The `CatStore` trait, document types and errors
//! - `mongo`: MongoDB-backed store
//! - `memory`: In-process store for tests and offline runs
//! - `config`: Connection settings from environment variables
//!
//! ## Example
//!
//! ```no_run
//! use taskboard_cats::{CatStore, MemoryCatStore, NewCat};
//!
//! # async fn example() -> taskboard_cats::CatResult<()> {
//! let store = MemoryCatStore::new();
//! store.create(NewCat::new("barsik", 3, ["ginger"])).await?;
//! let barsik = store.find_by_name("barsik").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod memory;
pub mod mongo;
pub mod store;

pub use config::MongoConfig;
pub use memory::MemoryCatStore;
pub use mongo::MongoCatStore;
pub use store::{Cat, CatResult, CatStore, CatStoreError, NewCat};
