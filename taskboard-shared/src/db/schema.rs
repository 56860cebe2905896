/// Schema initialization and teardown
///
/// The task board uses three tables. `status` and `users` are created before
/// `tasks`, which references both; teardown runs in the opposite order.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     fullname VARCHAR(100) NOT NULL,
///     email VARCHAR(100) NOT NULL UNIQUE
/// );
///
/// CREATE TABLE status (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(50) NOT NULL UNIQUE
/// );
///
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(100) NOT NULL,
///     description TEXT,
///     status_id INTEGER REFERENCES status(id),
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::db::schema::{initialize, teardown};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// initialize(&pool).await?;
/// initialize(&pool).await?; // no-op the second time
/// teardown(&pool).await?;
/// # Ok(())
/// # }
/// ```

use crate::models::status::TaskStatus;
use super::pool::quote_ident;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool};
use sqlx::{Connection, Executor};
use tracing::{debug, info};

/// Tables in creation order
pub const TABLES: [&str; 3] = ["users", "status", "tasks"];

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    fullname VARCHAR(100) NOT NULL,
    email VARCHAR(100) NOT NULL UNIQUE
)
"#;

const CREATE_STATUS: &str = r#"
CREATE TABLE IF NOT EXISTS status (
    id SERIAL PRIMARY KEY,
    name VARCHAR(50) NOT NULL UNIQUE
)
"#;

const CREATE_TASKS: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id SERIAL PRIMARY KEY,
    title VARCHAR(100) NOT NULL,
    description TEXT,
    status_id INTEGER REFERENCES status(id),
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
)
"#;

const SEED_STATUS: &str = r#"
INSERT INTO status (name)
SELECT unnest($1::text[])
ON CONFLICT (name) DO NOTHING
"#;

/// Dependents first
/// Database every server has, used to create the target one
const MAINTENANCE_DATABASE: &str = "postgres";

const DROP_ORDER: [&str; 3] = ["tasks", "status", "users"];

/// Creates the tables and seeds the status vocabulary
///
/// Safe to call any number of times: tables are created only if missing and
/// status names already present are skipped. Everything runs in one
/// transaction, so a failure part-way leaves the database untouched.
///
/// # Errors
///
/// Returns an error on connectivity or permission failures.
pub async fn initialize(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Initializing task board schema");

    let mut tx = pool.begin().await?;

    for (table, ddl) in [
        ("users", CREATE_USERS),
        ("status", CREATE_STATUS),
        ("tasks", CREATE_TASKS),
    ] {
        sqlx::query(ddl).execute(&mut *tx).await?;
        debug!(table, "Ensured table exists");
    }

    let names: Vec<String> = TaskStatus::ALL
        .iter()
        .map(|status| status.as_str().to_string())
        .collect();

    let inserted = sqlx::query(SEED_STATUS)
        .bind(names)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    info!(statuses_inserted = inserted, "Schema initialization complete");
    Ok(())
}

/// Drops `tasks`, `status` and `users`, in that order
///
/// Each drop is `IF EXISTS ... CASCADE`, so running against an empty database
/// succeeds.
pub async fn teardown(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Dropping task board schema");

    let mut tx = pool.begin().await?;

    for table in DROP_ORDER {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table} CASCADE"))
            .execute(&mut *tx)
            .await?;
        debug!(table, "Dropped table");
    }

    tx.commit().await?;

    info!("Tables 'tasks', 'status' and 'users' have been dropped");
    Ok(())
}

/// Returns true when all three tables are visible on the current `search_path`
pub async fn schema_exists(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        "SELECT to_regclass('users') IS NOT NULL
            AND to_regclass('status') IS NOT NULL
            AND to_regclass('tasks') IS NOT NULL",
    )
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Creates the database if it doesn't exist
///
/// Used by `taskboard init --create-database` for fresh development setups.
/// Connects to the `postgres` maintenance database with the same server and
/// credentials. Without an explicit database name the role name is used, as
/// the server itself does.
///
/// # Errors
///
/// Returns an error if the server is unreachable or the role lacks the
/// `CREATEDB` privilege.
pub async fn ensure_database_exists(options: &PgConnectOptions) -> Result<(), sqlx::Error> {
    let database = target_database(options);
    info!(database = %database, "Checking if database exists");

    let mut conn = PgConnection::connect_with(&options.clone().database(MAINTENANCE_DATABASE)).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&database)
            .fetch_one(&mut conn)
            .await?;

    if !exists {
        info!("Database does not exist, creating it");
        conn.execute(format!("CREATE DATABASE {}", quote_ident(&database)).as_str())
            .await?;
        info!("Database created successfully");
    } else {
        debug!("Database already exists");
    }

    conn.close().await
}

fn target_database(options: &PgConnectOptions) -> String {
    options
        .get_database()
        .unwrap_or_else(|| options.get_username())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_order_is_reverse_of_creation() {
        let mut reversed = TABLES;
        reversed.reverse();
        assert_eq!(reversed, DROP_ORDER);
    }

    #[test]
    fn test_tasks_table_cascades_on_user_delete() {
        assert!(CREATE_TASKS.contains("REFERENCES users(id) ON DELETE CASCADE"));
        assert!(CREATE_TASKS.contains("REFERENCES status(id)"));
    }

    #[test]
    fn test_target_database_falls_back_to_role_name() {
        let named = PgConnectOptions::new().username("app").database("board");
        assert_eq!(target_database(&named), "board");

        // URL parsing starts from libpq env defaults
        if std::env::var("PGDATABASE").is_err() {
            let unnamed: PgConnectOptions = "postgresql://app:pw@localhost:5432".parse().unwrap();
            assert_eq!(target_database(&unnamed), "app");
        }
    }

    #[test]
    fn test_status_seed_is_idempotent_sql() {
        assert!(SEED_STATUS.contains("ON CONFLICT (name) DO NOTHING"));
    }

    // Integration tests require a running database
    // These are in the tests/ directory
}
