/// User model and database operations
///
/// A user owns zero or more tasks. Deleting a user removes that user's tasks
/// through the `ON DELETE CASCADE` foreign key; no application code is
/// involved.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     fullname VARCHAR(100) NOT NULL,
///     email VARCHAR(100) NOT NULL UNIQUE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, &CreateUser {
///     fullname: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
/// }).await?;
///
/// let found = User::find_by_id(&pool, user.id).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres};
use validator::Validate;

/// Row of the `users` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Auto-assigned identifier
    pub id: i32,

    pub fullname: String,

    /// Unique across all users
    pub email: String,
}

/// Input for creating a new user
///
/// Limits mirror the column definitions.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100))]
    pub fullname: String,

    #[validate(email, length(max = 100))]
    pub email: String,
}

/// A user together with the number of tasks they own (zero included)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserTaskCount {
    pub user_id: i32,
    pub fullname: String,
    pub email: String,
    pub task_count: i64,
}

/// One (user, task) pair where the task is in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserTaskInProgress {
    pub user_id: i32,
    pub fullname: String,
    pub task_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
}

impl User {
    /// Creates a new user
    ///
    /// Accepts any executor so the seeder can insert inside its transaction.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an empty/oversized name or a malformed
    /// email, and `Error::Database` for a duplicate email (check with
    /// `Error::is_unique_violation`).
    pub async fn create<'e, E>(executor: E, data: &CreateUser) -> Result<Self>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        data.validate()?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (fullname, email)
            VALUES ($1, $2)
            RETURNING id, fullname, email
            "#,
        )
        .bind(&data.fullname)
        .bind(&data.email)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, fullname, email FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user and, by cascade, all of their tasks
    ///
    /// Returns true if the user existed.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all user IDs, lowest first
    pub async fn list_ids<'e, E>(executor: E) -> Result<Vec<i32>>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let ids = sqlx::query_scalar::<_, i32>("SELECT id FROM users ORDER BY id")
            .fetch_all(executor)
            .await?;

        Ok(ids)
    }

    /// Counts total number of users
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
