//! # task-cli
//!
//! A small command-line task tracker. Tasks are short descriptions with a
//! status (`todo`, `in-progress`, `done`) and creation/update timestamps, kept
//! in a single JSON file.
//!
//! ## Quick Start
//!
//! ```bash
//! task-cli add "Buy milk"
//! task-cli mark-in-progress 1
//! task-cli list in-progress
//! task-cli mark-done 1
//! task-cli delete 1
//! ```
//!
//! Data is stored in `./tasks.json` unless `--db <PATH>` is given. Set
//! `TASK_CLI_LOG` (e.g. `TASK_CLI_LOG=debug`) for diagnostics on stderr.
//!
//! User mistakes (unknown command, bad id, bad status filter, unknown task)
//! print a message and exit 0. I/O failures, and a task file that is JSON but
//! not a task list, exit with an error and leave the file untouched.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::error::ErrorKind;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;
pub mod db;
pub mod error;
pub mod fields;
pub mod task;

use cli::USAGE;
use db::{TaskStore, TASKS_FILE};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "TASK_CLI_LOG";

fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = match cli::parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(());
        }
        Err(e) => {
            debug!(error = %e, "could not parse arguments");
            println!("{USAGE}");
            return Ok(());
        }
    };

    let store = TaskStore::new(cli.db.unwrap_or_else(|| PathBuf::from(TASKS_FILE)));
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.into_action() {
        Ok(action) => cmd::run(&store, action, &mut out)
            .with_context(|| format!("task file {}", store.path().display()))?,
        Err(e) => writeln!(out, "{e}")?,
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
