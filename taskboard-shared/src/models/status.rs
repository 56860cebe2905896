/// Status vocabulary and the `status` lookup table
///
/// The table holds exactly the three names of [`TaskStatus`], seeded by
/// schema initialization. Catalog operations still accept status *names* as
/// plain strings so an unknown name can reach the database and be treated as
/// "no match" rather than rejected up front.

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres};
use std::fmt;
use std::str::FromStr;

/// Task lifecycle label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    New,

    #[serde(rename = "in progress")]
    InProgress,

    Completed,
}

impl TaskStatus {
    /// The full vocabulary, in seeding order
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::New,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Name as stored in `status.name`
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::New => "new",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the three status names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Row of the `status` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Status {
    pub id: i32,
    pub name: String,
}

/// Result row of the task-count-by-status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusTaskCount {
    pub status: String,
    pub task_count: i64,
}

impl Status {
    /// Lists every status row
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Status>("SELECT id, name FROM status")
            .fetch_all(pool)
            .await
    }

    /// Lists all status IDs, lowest first
    pub async fn list_ids<'e, E>(executor: E) -> Result<Vec<i32>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, i32>("SELECT id FROM status ORDER BY id")
            .fetch_all(executor)
            .await
    }

    /// Looks up a status by name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Status>("SELECT id, name FROM status WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Parses the row's name into the vocabulary enum
    pub fn kind(&self) -> Option<TaskStatus> {
        self.name.parse().ok()
    }
}
