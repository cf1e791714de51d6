//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to
//! embedded defaults.

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::Task;
use crate::error::PlannerError;

/// Context for the schedule prompt
///
/// Template variables: `{{task_list}}` and `{{task_count}}`. The embedded
/// prompt uses only the list; override templates may use either.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulePromptContext {
    /// Task descriptions as `- ` bulleted lines, in input order
    pub task_list: String,
    /// Number of tasks, for override templates
    pub task_count: usize,
}

impl SchedulePromptContext {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        debug!(task_count = %tasks.len(), "SchedulePromptContext::from_tasks: called");
        let task_list = tasks
            .iter()
            .map(|t| format!("- {}", t.description))
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            task_list,
            task_count: tasks.len(),
        }
    }
}

/// Context for the image prompt
#[derive(Debug, Clone, Serialize)]
pub struct ImagePromptContext {
    pub description: String,
    /// Visual concept phrase standing in for literal text
    pub concept: Option<String>,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine (HTML escaping disabled)
    hbs: Handlebars<'static>,
    /// User override directory holding `{name}.pmt` files
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `dir` before the embedded prompts
    pub fn new(dir: Option<impl AsRef<Path>>) -> Self {
        let override_dir = dir.map(|d| d.as_ref().to_path_buf()).filter(|d| d.exists());
        debug!(?override_dir, "PromptLoader::new: called");
        Self {
            hbs: Self::engine(),
            override_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            override_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks `{override_dir}/{name}.pmt` first, then the embedded prompt.
    fn load_template(&self, name: &str) -> Result<String, PlannerError> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| PlannerError::Prompt(format!("Failed to read prompt {}: {}", path.display(), e)));
            }
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| PlannerError::Prompt(format!("Prompt template not found: {}", name)))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String, PlannerError> {
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}'", template_name);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| PlannerError::Prompt(format!("Failed to render template {}: {}", template_name, e)))
    }

    /// Build the schedule prompt for a task list
    pub fn schedule_prompt(&self, tasks: &[Task]) -> Result<String, PlannerError> {
        self.render("schedule", &SchedulePromptContext::from_tasks(tasks))
    }

    /// Build the icon prompt for one task
    pub fn image_prompt(&self, context: &ImagePromptContext) -> Result<String, PlannerError> {
        self.render("image", context)
    }

    /// System prompt for schedule requests
    pub fn schedule_system_prompt(&self) -> &'static str {
        embedded::SCHEDULE_SYSTEM
    }
}
