//! Command implementations for the CLI interface.
//!
//! Each handler performs one store operation and prints the user-facing
//! outcome. "Not found" is a normal outcome here, not an error; only I/O
//! failures and a task file the store refuses to rewrite propagate.

use std::io::Write;

use crate::cli::Action;
use crate::db::{format_task, TaskStore};
use crate::error::Result;
use crate::fields::Status;

/// Run a validated action against the store.
pub fn run(store: &TaskStore, action: Action, out: &mut impl Write) -> Result<()> {
    match action {
        Action::Add(description) => cmd_add(store, description, out),
        Action::Update(id, description) => cmd_update(store, id, description, out),
        Action::Delete(id) => cmd_delete(store, id, out),
        Action::SetStatus(id, status) => cmd_mark(store, id, status, out),
        Action::List(status) => cmd_list(store, status, out),
    }
}

/// Add a new task.
pub fn cmd_add(store: &TaskStore, description: String, out: &mut impl Write) -> Result<()> {
    let task = store.add(description)?;
    writeln!(out, "Task added successfully with ID {}.", task.id)?;
    Ok(())
}

/// Replace a task's description.
pub fn cmd_update(
    store: &TaskStore,
    id: u64,
    description: String,
    out: &mut impl Write,
) -> Result<()> {
    match store.update(id, description)? {
        Some(_) => writeln!(out, "Task {id} updated successfully")?,
        None => writeln!(out, "Task {id} not found")?,
    }
    Ok(())
}

pub fn cmd_delete(store: &TaskStore, id: u64, out: &mut impl Write) -> Result<()> {
    match store.delete(id)? {
        Some(_) => writeln!(out, "Task {id} deleted successfully")?,
        None => writeln!(out, "Task {id} not found")?,
    }
    Ok(())
}

/// Set a task's status (`mark-in-progress` / `mark-done`).
pub fn cmd_mark(store: &TaskStore, id: u64, status: Status, out: &mut impl Write) -> Result<()> {
    match store.set_status(id, status)? {
        Some(_) => writeln!(out, "Task {id} marked as {status}")?,
        None => writeln!(out, "Task {id} not found")?,
    }
    Ok(())
}

/// Print tasks in stored order. An empty unfiltered store prints nothing.
pub fn cmd_list(store: &TaskStore, status: Option<Status>, out: &mut impl Write) -> Result<()> {
    let tasks = store.list(status)?;
    if let Some(status) = status {
        if tasks.is_empty() {
            writeln!(out, "No tasks with status '{status}' found")?;
            return Ok(());
        }
    }
    for task in &tasks {
        writeln!(out, "{}", format_task(task))?;
    }
    Ok(())
}
