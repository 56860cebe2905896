//! # Taskboard
//!
//! Command-line entry point.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskboard-cli -- init --create-database
//! cargo run -p taskboard-cli -- seed
//! cargo run -p taskboard-cli -- report --output output.txt
//! cargo run -p taskboard-cli -- cats --memory
//! ```

use clap::Parser;
use taskboard_cli::{cli::Cli, commands, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    tracing::info!("Taskboard v{} starting...", env!("CARGO_PKG_VERSION"));

    commands::run(cli.command).await
}
