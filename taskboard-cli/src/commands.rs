/// Subcommand implementations
///
/// Each command opens its own connections, does one job and closes them.
/// Connectivity failures surface as errors and end the process with a
/// non-zero exit code.

use crate::cats_demo;
use crate::cli::Command;
use crate::report::{run_report, ReportOptions};
use anyhow::{bail, Context};
use sqlx::PgPool;
use std::path::Path;
use taskboard_cats::{CatStore, MemoryCatStore, MongoCatStore, MongoConfig};
use taskboard_shared::config::PostgresConfig;
use taskboard_shared::db::{pool, schema};
use taskboard_shared::seed::{seed_database, SeedConfig, TaskAssignment};
use tracing::{info, warn};

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Init { create_database } => init(create_database).await,
        Command::Drop => drop_tables().await,
        Command::Seed {
            users,
            tasks,
            all_users,
            seed,
        } => {
            let assignment = if all_users {
                TaskAssignment::AllUsers
            } else {
                TaskAssignment::ExcludeFirstUser
            };
            seed_tables(SeedConfig {
                users,
                tasks,
                assignment,
                rng_seed: seed,
            })
            .await
        }
        Command::Report { output, user_id } => {
            let options = ReportOptions {
                user_id,
                ..Default::default()
            };
            report(&output, &options).await
        }
        Command::Cats { memory } => cats(memory).await,
    }
}

fn load_config() -> anyhow::Result<PostgresConfig> {
    PostgresConfig::from_env().context("Failed to load PostgreSQL configuration")
}

async fn connect(config: &PostgresConfig) -> anyhow::Result<PgPool> {
    info!(url = %config.redacted_url(), "Connecting to PostgreSQL");

    let pool = pool::create_pool(config.pool_config()?)
        .await
        .with_context(|| format!("Failed to connect to {}", config.redacted_url()))?;
    Ok(pool)
}

async fn init(create_database: bool) -> anyhow::Result<()> {
    let config = load_config()?;
    if create_database {
        schema::ensure_database_exists(&config.connect_options()?)
            .await
            .context("Failed to create database")?;
    }

    let pool = connect(&config).await?;
    schema::initialize(&pool).await.context("Failed to initialize schema")?;
    pool::close_pool(pool).await;

    println!("Schema initialized");
    Ok(())
}

async fn drop_tables() -> anyhow::Result<()> {
    let pool = connect(&load_config()?).await?;
    schema::teardown(&pool).await.context("Failed to drop tables")?;
    pool::close_pool(pool).await;

    println!("Tables dropped");
    Ok(())
}

async fn seed_tables(config: SeedConfig) -> anyhow::Result<()> {
    let pool = connect(&load_config()?).await?;
    require_schema(&pool).await?;

    let result = seed_database(&pool, &config).await.context("Seeding failed");
    pool::close_pool(pool).await;
    let seeded = result?;

    println!("Inserted {} users and {} tasks", seeded.users, seeded.tasks);
    Ok(())
}

async fn report(output: &Path, options: &ReportOptions) -> anyhow::Result<()> {
    let pool = connect(&load_config()?).await?;
    require_schema(&pool).await?;

    let result = run_report(&pool, options).await.context("Report failed");
    pool::close_pool(pool).await;
    let report = result?;

    tokio::fs::write(output, report.render())
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(path = %output.display(), "Report written");
    println!("Report written to {}", output.display());
    Ok(())
}

async fn cats(memory: bool) -> anyhow::Result<()> {
    let store: Box<dyn CatStore> = if memory {
        Box::new(MemoryCatStore::new())
    } else {
        let config = MongoConfig::from_env().context("Failed to load MongoDB configuration")?;
        Box::new(
            MongoCatStore::connect(&config)
                .await
                .context("Failed to connect to MongoDB")?,
        )
    };

    let mut stdout = std::io::stdout();
    let summary = cats_demo::run_demo(store.as_ref(), &mut stdout).await?;
    if summary.failed > 0 {
        warn!(failed = summary.failed, "Some cats operations failed");
    }
    Ok(())
}

async fn require_schema(pool: &PgPool) -> anyhow::Result<()> {
    if !schema::schema_exists(pool).await? {
        bail!("Tables are missing; run `taskboard init` first");
    }
    Ok(())
}
