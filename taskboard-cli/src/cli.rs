/// Command-line arguments
///
/// Connection settings come from the environment (see `PostgresConfig` and
/// `MongoConfig`); flags only shape what each command does.

use crate::logging::LogFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskboard_shared::seed::{DEFAULT_TASKS, DEFAULT_USERS};

pub const DEFAULT_REPORT_PATH: &str = "output.txt";

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Task board schema, seeding and query tools")]
pub struct Cli {
    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the users, status and tasks tables and seed the status names
    Init {
        /// Create the target database first if it does not exist
        #[arg(long)]
        create_database: bool,
    },

    /// Drop all three tables
    Drop,

    /// Insert fake users and tasks
    Seed {
        #[arg(long, default_value_t = DEFAULT_USERS)]
        users: usize,

        #[arg(long, default_value_t = DEFAULT_TASKS)]
        tasks: usize,

        /// Let every user receive tasks, including the first one
        #[arg(long)]
        all_users: bool,

        /// Fixed RNG seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run the query demonstration and write a plain-text report
    Report {
        #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,

        /// User whose tasks are listed and who gets renamed
        #[arg(long, default_value_t = 1)]
        user_id: i32,
    },

    /// Walk through create, read, update and delete on the cats collection
    Cats {
        /// Use the in-process store instead of MongoDB
        #[arg(long)]
        memory: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_defaults() {
        let cli = Cli::parse_from(["taskboard", "seed"]);
        match cli.command {
            Command::Seed { users, tasks, all_users, seed } => {
                assert_eq!(users, DEFAULT_USERS);
                assert_eq!(tasks, DEFAULT_TASKS);
                assert!(!all_users);
                assert!(seed.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_report_flags() {
        let cli = Cli::parse_from(["taskboard", "report", "-o", "out.txt", "--user-id", "7"]);
        match cli.command {
            Command::Report { output, user_id } => {
                assert_eq!(output, PathBuf::from("out.txt"));
                assert_eq!(user_id, 7);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_log_format() {
        let cli = Cli::parse_from(["taskboard", "cats", "--memory", "--log-format", "json"]);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Command::Cats { memory: true }));
    }
}
