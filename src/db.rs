//! Task store backed by a single JSON file.
//!
//! Every operation is a full read-modify-write cycle: the whole task list is
//! loaded from disk, changed in memory and written back. Nothing is cached
//! between calls, so two processes sharing a file follow last-writer-wins.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::fields::Status;
use crate::task::Task;

/// Backing file used when no `--db` path is given.
pub const TASKS_FILE: &str = "tasks.json";

/// File-backed repository of tasks.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all tasks in stored order.
    ///
    /// A missing file is an empty store, and so is content that is not JSON at
    /// all (a warning is logged and the next save overwrites it). JSON that
    /// parses but is not a task list is an [`Error::UnexpectedContent`], so
    /// callers never save over it.
    pub fn load(&self) -> Result<Vec<Task>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no backing file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let value: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "backing file is not valid JSON, treating it as empty"
                );
                return Ok(Vec::new());
            }
        };
        let tasks: Vec<Task> =
            serde_json::from_value(value).map_err(|source| Error::UnexpectedContent {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Overwrite the backing file with `tasks` (temp file + rename).
    ///
    /// A symlinked backing file is written through: the link's target is
    /// replaced, not the link. The temp file is removed if the write fails.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let data = serde_json::to_string_pretty(tasks)?;
        let target = self.write_target();
        let tmp = tmp_path(&target);
        if let Err(e) = write_then_rename(&tmp, &target, data.as_bytes()) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(path = %target.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Append a new `todo` task and return it.
    pub fn add(&self, description: impl Into<String>) -> Result<Task> {
        let mut tasks = self.load()?;
        let task = Task::new(next_id(&tasks)?, description);
        tasks.push(task.clone());
        self.save(&tasks)?;
        info!(id = task.id, "added task");
        Ok(task)
    }

    /// Replace a task's description. `None` if no task has `id`.
    pub fn update(&self, id: u64, description: impl Into<String>) -> Result<Option<Task>> {
        let description = description.into();
        let updated = self.modify(id, |t| t.description = description)?;
        if updated.is_some() {
            info!(id, "updated task description");
        }
        Ok(updated)
    }

    /// Overwrite a task's status. `None` if no task has `id`.
    pub fn set_status(&self, id: u64, status: Status) -> Result<Option<Task>> {
        let updated = self.modify(id, |t| t.status = status)?;
        if updated.is_some() {
            info!(id, %status, "changed task status");
        }
        Ok(updated)
    }

    /// Remove a task, keeping the others in order. Returns the removed task.
    pub fn delete(&self, id: u64) -> Result<Option<Task>> {
        let mut tasks = self.load()?;
        let Some(idx) = tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let removed = tasks.remove(idx);
        self.save(&tasks)?;
        info!(id, "deleted task");
        Ok(Some(removed))
    }

    /// Tasks in stored order, optionally only those with `status`. Never writes.
    pub fn list(&self, status: Option<Status>) -> Result<Vec<Task>> {
        let mut tasks = self.load()?;
        if let Some(status) = status {
            tasks.retain(|t| t.status == status);
        }
        Ok(tasks)
    }

    /// Apply `change` to the first task with `id`, refresh its timestamp and save.
    /// Nothing is written when the id is unknown.
    fn modify(&self, id: u64, change: impl FnOnce(&mut Task)) -> Result<Option<Task>> {
        let mut tasks = self.load()?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        change(task);
        task.touch();
        let updated = task.clone();
        self.save(&tasks)?;
        Ok(Some(updated))
    }

    /// The file a save replaces: the symlink target if the path is a link
    /// that resolves, the path itself otherwise.
    fn write_target(&self) -> PathBuf {
        match fs::symlink_metadata(&self.path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
            }
            _ => self.path.clone(),
        }
    }
}

/// Generate the next available task ID.
pub fn next_id(tasks: &[Task]) -> Result<u64> {
    let max = tasks.iter().map(|t| t.id).max().unwrap_or(0);
    max.checked_add(1).ok_or(Error::IdSpaceExhausted(max))
}

/// Render a task as the multi-line block printed by `list`.
pub fn format_task(task: &Task) -> String {
    format!(
        "ID: {}\nDescription: {}\nStatus: {}\nCreated: {}\nLast Updated: {}\n{}",
        task.id,
        task.description,
        task.status,
        task.created_at,
        task.updated_at,
        "-".repeat(30)
    )
}

fn write_then_rename(tmp: &Path, target: &Path, data: &[u8]) -> io::Result<()> {
    let mut f = File::create(tmp)?;
    f.write_all(data)?;
    f.flush()?;
    fs::rename(tmp, target)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
