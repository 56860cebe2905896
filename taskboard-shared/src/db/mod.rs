/// Database layer for Taskboard
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks and optional `search_path`
/// - `schema`: Idempotent table creation, status seeding and teardown
/// - Row models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::config::PostgresConfig;
/// use taskboard_shared::db::{pool::create_pool, schema::initialize};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = PostgresConfig::from_env()?;
///     let pool = create_pool(config.pool_config()?).await?;
///     initialize(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod pool;
pub mod schema;
