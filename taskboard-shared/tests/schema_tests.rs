/// Integration tests for schema initialization and teardown
///
/// These tests require a running PostgreSQL database (see tests/common).
/// Run with: cargo test -p taskboard-shared --test schema_tests

#[macro_use]
mod common;

use std::collections::HashSet;
use sqlx::postgres::PgConnectOptions;
use taskboard_shared::db::schema::{ensure_database_exists, initialize, schema_exists, teardown};
use taskboard_shared::models::{Status, TaskStatus};

#[tokio::test]
async fn test_initialize_creates_tables_and_statuses() {
    let db = require_db!();

    assert!(!schema_exists(&db.pool).await.unwrap());

    initialize(&db.pool).await.expect("Initialization failed");
    assert!(schema_exists(&db.pool).await.unwrap());

    let names: HashSet<String> = Status::list(&db.pool)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    let expected: HashSet<String> = TaskStatus::ALL
        .iter()
        .map(|s| s.as_str().to_string())
        .collect();
    assert_eq!(names, expected);

    db.cleanup().await;
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let db = require_db!();

    for _ in 0..3 {
        initialize(&db.pool).await.expect("Repeated initialization failed");
    }

    let statuses = Status::list(&db.pool).await.unwrap();
    assert_eq!(statuses.len(), 3, "Status rows must not be duplicated");

    let mut expected: Vec<i32> = statuses.iter().map(|s| s.id).collect();
    expected.sort();
    assert_eq!(Status::list_ids(&db.pool).await.unwrap(), expected);

    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM information_schema.tables
         WHERE table_schema = current_schema()
           AND table_name IN ('users', 'status', 'tasks')",
    )
    .fetch_one(&db.pool)
    .await
    .unwrap();
    assert_eq!(tables, 3);

    db.cleanup().await;
}

#[tokio::test]
async fn test_teardown_removes_tables() {
    let db = require_db!();

    initialize(&db.pool).await.unwrap();
    teardown(&db.pool).await.expect("Teardown failed");

    assert!(!schema_exists(&db.pool).await.unwrap());

    db.cleanup().await;
}

#[tokio::test]
async fn test_teardown_without_tables_succeeds() {
    let db = require_db!();

    teardown(&db.pool).await.expect("Teardown on empty schema failed");
    teardown(&db.pool).await.expect("Second teardown failed");

    db.cleanup().await;
}

#[tokio::test]
async fn test_teardown_then_initialize_starts_fresh() {
    let db = require_db!();

    initialize(&db.pool).await.unwrap();
    sqlx::query("INSERT INTO users (fullname, email) VALUES ('A', 'a@example.com')")
        .execute(&db.pool)
        .await
        .unwrap();

    teardown(&db.pool).await.unwrap();
    initialize(&db.pool).await.unwrap();

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(users, 0);
    assert_eq!(Status::list(&db.pool).await.unwrap().len(), 3);

    db.cleanup().await;
}

#[tokio::test]
async fn test_ensure_database_exists_accepts_existing_database() {
    let db = require_db!();
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("database URL checked by require_db");
    let options: PgConnectOptions = url.parse().expect("Invalid test database URL");

    ensure_database_exists(&options)
        .await
        .expect("Existing database should be accepted");

    db.cleanup().await;
}
