//! User-entered tasks and the in-memory task list

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlannerError;

/// A free-text activity to be scheduled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque identifier (UUIDv7 when created locally)
    #[serde(default)]
    pub id: String,

    /// What the user wants to do; never blank
    pub description: String,
}

impl Task {
    /// Create a task with a fresh id
    pub fn new(description: impl Into<String>) -> Self {
        let description = description.into();
        debug!(%description, "Task::new: called");
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            description,
        }
    }

    /// Create a task with an explicit id
    pub fn with_id(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }

    /// True when the description has no visible characters
    pub fn is_blank(&self) -> bool {
        self.description.trim().is_empty()
    }
}

/// Ordered list of tasks for one planning session
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task, trimming the description
    ///
    /// Blank descriptions are rejected.
    pub fn add(&mut self, description: &str) -> Result<&Task, PlannerError> {
        let description = description.trim();
        debug!(%description, "TaskList::add: called");
        if description.is_empty() {
            debug!("TaskList::add: blank description rejected");
            return Err(PlannerError::InvalidRequest("Task cannot be empty".to_string()));
        }

        self.tasks.push(Task::new(description));
        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    /// Remove a task by id, returning it if it was present
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        debug!(%id, "TaskList::remove: called");
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TaskList {
    /// Collect descriptions into a list, skipping blank ones
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = TaskList::new();
        for description in iter {
            let _ = list.add(description.as_ref());
        }
        list
    }
}
