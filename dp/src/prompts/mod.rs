//! Prompt templates
//!
//! Embedded defaults with optional on-disk overrides, rendered with handlebars.

pub mod embedded;
mod loader;

pub use loader::{ImagePromptContext, PromptLoader, SchedulePromptContext};
