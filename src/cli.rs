//! Command-line surface: argument model, usage text and argument validation.
//!
//! Parsing failures never reach the store. Unknown commands and wrong argument
//! counts fall back to the usage block; a bad id or status filter becomes an
//! [`InvalidArgument`] that the caller prints.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::fields::Status;

/// Printed whenever the command line cannot be understood.
pub const USAGE: &str = "Usage:
  task-cli add \"Task description\"
  task-cli update <task_id> \"New description\"
  task-cli delete <task_id>
  task-cli mark-in-progress <task_id>
  task-cli mark-done <task_id>
  task-cli list
  task-cli list todo|in-progress|done";

/// Simple, file-backed task tracker.
/// Storage defaults to ./tasks.json or a path passed via --db.
#[derive(Parser, Debug)]
#[command(name = "task-cli", version, about = "Track short tasks from the terminal")]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Task description; remaining words are joined with spaces.
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        description: Vec<String>,
    },

    /// Replace the description of a task.
    Update {
        #[arg(allow_hyphen_values = true)]
        id: String,
        /// New description; remaining words are joined with spaces.
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        description: Vec<String>,
    },

    /// Delete a task.
    Delete {
        #[arg(allow_hyphen_values = true)]
        id: String,
    },

    /// Mark a task as in progress.
    MarkInProgress {
        #[arg(allow_hyphen_values = true)]
        id: String,
    },

    /// Mark a task as done.
    MarkDone {
        #[arg(allow_hyphen_values = true)]
        id: String,
    },

    /// List tasks, optionally only those with the given status.
    List {
        /// todo | in-progress | done
        status: Option<String>,
    },
}

/// A validated request for the task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(String),
    Update(u64, String),
    Delete(u64),
    SetStatus(u64, Status),
    List(Option<Status>),
}

/// User input rejected before the store is called.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    #[error("Invalid task ID")]
    TaskId(String),
    #[error("Invalid status filter. Use 'todo', 'in-progress', or 'done'")]
    StatusFilter(String),
}

impl Commands {
    /// Validate ids and the status filter, producing the store request.
    pub fn into_action(self) -> Result<Action, InvalidArgument> {
        let action = match self {
            Commands::Add { description } => Action::Add(description.join(" ")),
            Commands::Update { id, description } => {
                Action::Update(parse_task_id(&id)?, description.join(" "))
            }
            Commands::Delete { id } => Action::Delete(parse_task_id(&id)?),
            Commands::MarkInProgress { id } => {
                Action::SetStatus(parse_task_id(&id)?, Status::InProgress)
            }
            Commands::MarkDone { id } => Action::SetStatus(parse_task_id(&id)?, Status::Done),
            Commands::List { status: None } => Action::List(None),
            Commands::List { status: Some(raw) } => Action::List(Some(
                raw.parse::<Status>()
                    .map_err(|_| InvalidArgument::StatusFilter(raw))?,
            )),
        };
        Ok(action)
    }
}

/// Parse a task id as typed by the user (surrounding whitespace ignored).
pub fn parse_task_id(raw: &str) -> Result<u64, InvalidArgument> {
    raw.trim()
        .parse()
        .map_err(|_| InvalidArgument::TaskId(raw.to_string()))
}

/// Parse a full argument vector (program name first). The command word is
/// matched case-insensitively.
pub fn parse_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Cli::try_parse_from(normalise_args(args))
}

/// Lowercase the first positional argument, skipping `--db <PATH>`.
fn normalise_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let mut i = 1;
    while i < args.len() {
        let Some(arg) = args[i].to_str() else {
            break;
        };
        if arg == "--db" {
            i += 2;
            continue;
        }
        if arg.starts_with('-') {
            i += 1;
            continue;
        }
        let lowered = arg.to_lowercase();
        args[i] = lowered.into();
        break;
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn action(args: &[&str]) -> Result<Action, InvalidArgument> {
        let mut argv = vec!["task-cli"];
        argv.extend_from_slice(args);
        parse_from(argv).unwrap().command.into_action()
    }

    fn rejected(args: &[&str]) -> bool {
        let mut argv = vec!["task-cli"];
        argv.extend_from_slice(args);
        parse_from(argv).is_err()
    }

    #[test]
    fn add_joins_words() {
        assert_eq!(action(&["add", "Buy milk"]), Ok(Action::Add("Buy milk".into())));
        assert_eq!(action(&["add", "Buy", "milk"]), Ok(Action::Add("Buy milk".into())));
        assert_eq!(action(&["add", ""]), Ok(Action::Add(String::new())));
    }

    #[test]
    fn add_keeps_hyphenated_words() {
        assert_eq!(
            action(&["add", "check", "-v", "output"]),
            Ok(Action::Add("check -v output".into()))
        );
    }

    #[test]
    fn update_parses_id_and_description() {
        assert_eq!(
            action(&["update", "3", "New", "text"]),
            Ok(Action::Update(3, "New text".into()))
        );
        assert_eq!(
            action(&["update", "x", "New"]),
            Err(InvalidArgument::TaskId("x".into()))
        );
    }

    #[test]
    fn id_commands_reject_non_integers() {
        for cmd in ["delete", "mark-in-progress", "mark-done"] {
            assert_eq!(
                action(&[cmd, "1.5"]),
                Err(InvalidArgument::TaskId("1.5".into())),
                "{cmd}"
            );
        }
        assert_eq!(action(&["delete", "-1"]), Err(InvalidArgument::TaskId("-1".into())));
        assert_eq!(
            InvalidArgument::TaskId("abc".into()).to_string(),
            "Invalid task ID"
        );
    }

    #[test]
    fn mark_commands_map_to_statuses() {
        assert_eq!(
            action(&["mark-in-progress", "2"]),
            Ok(Action::SetStatus(2, Status::InProgress))
        );
        assert_eq!(action(&["mark-done", " 7 "]), Ok(Action::SetStatus(7, Status::Done)));
    }

    #[test]
    fn list_filter_is_validated() {
        assert_eq!(action(&["list"]), Ok(Action::List(None)));
        assert_eq!(action(&["list", "DONE"]), Ok(Action::List(Some(Status::Done))));
        assert_eq!(
            action(&["list", "in-progress"]),
            Ok(Action::List(Some(Status::InProgress)))
        );
        let err = action(&["list", "later"]).unwrap_err();
        assert_eq!(err, InvalidArgument::StatusFilter("later".into()));
        assert_eq!(
            err.to_string(),
            "Invalid status filter. Use 'todo', 'in-progress', or 'done'"
        );
    }

    #[test]
    fn command_word_is_case_insensitive() {
        assert_eq!(action(&["ADD", "x"]), Ok(Action::Add("x".into())));
        assert_eq!(action(&["Mark-Done", "1"]), Ok(Action::SetStatus(1, Status::Done)));
    }

    #[test]
    fn wrong_shapes_are_rejected() {
        assert!(rejected(&[]));
        assert!(rejected(&["frobnicate"]));
        assert!(rejected(&["help"]));
        assert!(rejected(&["add"]));
        assert!(rejected(&["update", "1"]));
        assert!(rejected(&["delete"]));
        assert!(rejected(&["delete", "1", "2"]));
        assert!(rejected(&["mark-done", "1", "2"]));
        assert!(rejected(&["list", "todo", "done"]));
    }

    #[test]
    fn db_option_overrides_path() {
        let cli = parse_from(["task-cli", "--db", "/tmp/Other.json", "LIST"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/Other.json")));
        assert_eq!(cli.command, Commands::List { status: None });
    }

    #[test]
    fn help_and_version_are_clap_builtins() {
        let err = parse_from(["task-cli", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        let err = parse_from(["task-cli", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn usage_lists_every_command() {
        for cmd in ["add", "update", "delete", "mark-in-progress", "mark-done", "list"] {
            assert!(USAGE.contains(&format!("task-cli {cmd}")), "{cmd}");
        }
    }
}
