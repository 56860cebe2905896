/// The query catalog
///
/// Each function runs exactly one statement on a connection borrowed from the
/// pool; joins happen server-side. None of the statements sort their output,
/// so callers must not rely on row order.
///
/// "No match" is never an error: lookups return `None` or an empty `Vec`, and
/// writes return whether a row was touched.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::queries;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> taskboard_shared::Result<()> {
/// for task in queries::tasks_by_status(&pool, "new").await? {
///     queries::update_task_status(&pool, task.id, "in progress").await?;
/// }
/// # Ok(())
/// # }
/// ```

use crate::error::Result;
use crate::models::{
    NewTask, StatusTaskCount, TaskStatus, TaskSummary, TaskWithOwner, TaskWithStatus, User,
    UserTaskCount, UserTaskInProgress,
};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use validator::Validate;

/// Owner of a task
pub async fn user_for_task(pool: &PgPool, task_id: i32) -> Result<Option<User>> {
    debug!(task_id, "Fetching user for task");

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT users.id, users.fullname, users.email
        FROM tasks
        JOIN users ON tasks.user_id = users.id
        WHERE tasks.id = $1
        "#,
    )
    .bind(task_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// All tasks owned by a user, with status names
///
/// Tasks whose status is NULL are not returned (inner join).
pub async fn tasks_for_user(pool: &PgPool, user_id: i32) -> Result<Vec<TaskWithStatus>> {
    debug!(user_id, "Fetching tasks for user");

    let tasks = sqlx::query_as::<_, TaskWithStatus>(
        r#"
        SELECT tasks.id, tasks.title, tasks.description, status.name AS status
        FROM tasks
        JOIN status ON tasks.status_id = status.id
        WHERE tasks.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// All tasks with the given status name
pub async fn tasks_by_status(pool: &PgPool, status_name: &str) -> Result<Vec<TaskWithStatus>> {
    debug!(status = status_name, "Fetching tasks by status");

    let tasks = sqlx::query_as::<_, TaskWithStatus>(
        r#"
        SELECT tasks.id, tasks.title, tasks.description, status.name AS status
        FROM tasks
        JOIN status ON tasks.status_id = status.id
        WHERE tasks.status_id = (SELECT id FROM status WHERE name = $1)
        "#,
    )
    .bind(status_name)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Moves a task to another status
///
/// Returns false when the task does not exist or the status name is unknown;
/// in both cases nothing changes, so the task keeps its previous status.
pub async fn update_task_status(pool: &PgPool, task_id: i32, status_name: &str) -> Result<bool> {
    debug!(task_id, status = status_name, "Updating task status");

    let result = sqlx::query(
        r#"
        UPDATE tasks
        SET status_id = status.id
        FROM status
        WHERE status.name = $1 AND tasks.id = $2
        "#,
    )
    .bind(status_name)
    .bind(task_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Users that no task references
pub async fn users_without_tasks(pool: &PgPool) -> Result<Vec<User>> {
    debug!("Fetching users without tasks");

    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT users.id, users.fullname, users.email
        FROM users
        WHERE NOT EXISTS (SELECT 1 FROM tasks WHERE tasks.user_id = users.id)
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Adds a task for a user, resolving the status by name
///
/// Returns the new task's id, or `None` if the status name is unknown (no row
/// is inserted).
///
/// # Errors
///
/// Returns `Error::Validation` for an empty or oversized title and
/// `Error::Database` if the user does not exist.
pub async fn add_task(pool: &PgPool, task: &NewTask) -> Result<Option<i32>> {
    task.validate()?;

    debug!(user_id = task.user_id, status = %task.status, "Adding task");

    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO tasks (title, description, status_id, user_id)
        SELECT $1, $2, status.id, $4
        FROM status
        WHERE status.name = $3
        RETURNING id
        "#,
    )
    .bind(&task.title)
    .bind(&task.description)
    .bind(&task.status)
    .bind(task.user_id)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Tasks whose status is anything but `completed`
pub async fn incomplete_tasks(pool: &PgPool) -> Result<Vec<TaskWithStatus>> {
    debug!("Fetching incomplete tasks");

    let tasks = sqlx::query_as::<_, TaskWithStatus>(
        r#"
        SELECT tasks.id, tasks.title, tasks.description, status.name AS status
        FROM tasks
        JOIN status ON tasks.status_id = status.id
        WHERE status.name <> $1
        "#,
    )
    .bind(TaskStatus::Completed.as_str())
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Deletes a task; returns false if it did not exist
pub async fn delete_task(pool: &PgPool, task_id: i32) -> Result<bool> {
    debug!(task_id, "Deleting task");

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Users whose email matches an SQL `LIKE` pattern (e.g. `%@example.com%`)
pub async fn users_by_email_pattern(pool: &PgPool, pattern: &str) -> Result<Vec<User>> {
    debug!(pattern, "Finding users by email pattern");

    let users = sqlx::query_as::<_, User>(
        "SELECT id, fullname, email FROM users WHERE email LIKE $1",
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

#[derive(Debug, Deserialize, Validate)]
struct Rename {
    #[validate(length(min = 1, max = 100))]
    fullname: String,
}

/// Renames a user; returns false if the user does not exist
pub async fn update_user_fullname(pool: &PgPool, user_id: i32, fullname: &str) -> Result<bool> {
    Rename {
        fullname: fullname.to_string(),
    }
    .validate()?;

    debug!(user_id, "Updating user fullname");

    let result = sqlx::query("UPDATE users SET fullname = $1 WHERE id = $2")
        .bind(fullname)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Number of tasks per status
///
/// Statuses with no tasks are absent from the result.
pub async fn task_count_by_status(pool: &PgPool) -> Result<Vec<StatusTaskCount>> {
    debug!("Counting tasks by status");

    let counts = sqlx::query_as::<_, StatusTaskCount>(
        r#"
        SELECT status.name AS status, COUNT(tasks.id) AS task_count
        FROM tasks
        JOIN status ON tasks.status_id = status.id
        GROUP BY status.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

/// Tasks owned by users whose email ends with `domain` (e.g. `@example.com`)
///
/// `domain` is a `LIKE` suffix, so `%` and `_` inside it act as wildcards.
pub async fn tasks_for_email_domain(pool: &PgPool, domain: &str) -> Result<Vec<TaskWithOwner>> {
    debug!(domain, "Fetching tasks for email domain");

    let tasks = sqlx::query_as::<_, TaskWithOwner>(
        r#"
        SELECT tasks.id, tasks.title, tasks.description,
               users.fullname, users.email, status.name AS status
        FROM tasks
        JOIN users ON tasks.user_id = users.id
        JOIN status ON tasks.status_id = status.id
        WHERE users.email LIKE '%' || $1
        "#,
    )
    .bind(domain)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Tasks whose description is NULL or empty
pub async fn tasks_without_description(pool: &PgPool) -> Result<Vec<TaskSummary>> {
    debug!("Fetching tasks without description");

    let tasks = sqlx::query_as::<_, TaskSummary>(
        r#"
        SELECT id, title, user_id, status_id
        FROM tasks
        WHERE description IS NULL OR description = ''
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Users paired with each of their `in progress` tasks
pub async fn users_with_in_progress_tasks(pool: &PgPool) -> Result<Vec<UserTaskInProgress>> {
    debug!("Fetching users with in-progress tasks");

    let rows = sqlx::query_as::<_, UserTaskInProgress>(
        r#"
        SELECT users.id AS user_id, users.fullname,
               tasks.id AS task_id, tasks.title, tasks.description,
               status.name AS status
        FROM tasks
        JOIN users ON tasks.user_id = users.id
        JOIN status ON tasks.status_id = status.id
        WHERE status.name = $1
        "#,
    )
    .bind(TaskStatus::InProgress.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Every user with their task count, including users with no tasks
pub async fn users_and_task_count(pool: &PgPool) -> Result<Vec<UserTaskCount>> {
    debug!("Counting tasks per user");

    let rows = sqlx::query_as::<_, UserTaskCount>(
        r#"
        SELECT users.id AS user_id, users.fullname, users.email,
               COUNT(tasks.id) AS task_count
        FROM users
        LEFT JOIN tasks ON users.id = tasks.user_id
        GROUP BY users.id, users.fullname, users.email
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
