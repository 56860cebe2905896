/// Task model and database operations
///
/// Every task belongs to exactly one user and normally carries one status.
/// `status_id` is nullable at the schema level, but inserts made through this
/// crate always resolve a status first.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(100) NOT NULL,
///     description TEXT,
///     status_id INTEGER REFERENCES status(id),
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// );
/// ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres};
use validator::Validate;

/// Row of the `tasks` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status_id: Option<i32>,
    pub user_id: i32,
}

/// Input for inserting a task with an already-resolved status id
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    pub description: Option<String>,

    pub status_id: i32,

    pub user_id: i32,
}

/// Input for the add-task catalog operation, which resolves the status by name
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTask {
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    pub description: Option<String>,

    /// One of `new`, `in progress`, `completed`; anything else inserts nothing
    pub status: String,

    pub user_id: i32,
}

/// Task joined with its status name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithStatus {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
}

/// Task without its description, as returned by the tasks-without-description query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskSummary {
    pub id: i32,
    pub title: String,
    pub user_id: i32,
    pub status_id: Option<i32>,
}

/// Task joined with its owner and status name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithOwner {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub fullname: String,
    pub email: String,
    pub status: String,
}

impl Task {
    /// Inserts a task
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for an empty or oversized title and
    /// `Error::Database` if the user or status does not exist.
    pub async fn create<'e, E>(executor: E, data: &CreateTask) -> Result<Self>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        data.validate()?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, status_id, user_id
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status_id)
        .bind(data.user_id)
        .fetch_one(executor)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT id, title, description, status_id, user_id FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Counts all tasks
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts tasks that reference a status
    pub async fn count_with_status(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE status_id IS NOT NULL")
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// True when the description is missing or empty
    pub fn lacks_description(&self) -> bool {
        self.description.as_deref().map_or(true, str::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(description: Option<&str>) -> Task {
        Task {
            id: 1,
            title: "Write report".to_string(),
            description: description.map(str::to_string),
            status_id: Some(1),
            user_id: 1,
        }
    }

    #[test]
    fn test_lacks_description() {
        assert!(task(None).lacks_description());
        assert!(task(Some("")).lacks_description());
        assert!(!task(Some("quarterly numbers")).lacks_description());
    }

    #[test]
    fn test_create_task_validation() {
        let valid = CreateTask {
            title: "Write report".to_string(),
            description: None,
            status_id: 1,
            user_id: 1,
        };
        assert!(valid.validate().is_ok());

        let empty = CreateTask {
            title: String::new(),
            ..valid.clone()
        };
        assert!(empty.validate().is_err());

        let long = CreateTask {
            title: "t".repeat(101),
            ..valid
        };
        assert!(long.validate().is_err());
    }
}
