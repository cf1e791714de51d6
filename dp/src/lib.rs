//! dayplanner - LLM-backed daily task planner
//!
//! Turns a list of free-text tasks into an ordered daily schedule with an
//! explanation by relaying a single prompt to a hosted chat API, and
//! optionally fetches one illustrative image per task.
//!
//! # Core Concepts
//!
//! - **One call per plan**: exactly one provider request, no retries, no fallback between providers
//! - **Best-effort parsing**: lines without a time token are dropped, never an error
//! - **Mock mode**: keyword bucketing produces a schedule without any network call
//! - **Images never fail a plan**: failures degrade to a category placeholder
//!
//! # Modules
//!
//! - [`domain`] - Tasks and schedule types
//! - [`prompts`] - Schedule and image prompt templates
//! - [`llm`] - LLM client trait with OpenAI and Anthropic implementations
//! - [`planner`] - Provider dispatch, reply parser and mock generator
//! - [`image`] - Image generation, fallback and cache
//! - [`server`] - HTTP relay
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod image;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod server;

// Re-export commonly used types
pub use config::{ApiConfig, Config, LlmConfig, Provider};
pub use domain::{PlannerResponse, ScheduleItem, Task, TaskList};
pub use error::PlannerError;
pub use image::{ImageResult, ImageService};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use planner::{Planner, ScheduleParser};
pub use prompts::PromptLoader;
pub use server::AppState;
