//! Domain types for dayplanner
//!
//! Core domain types: Task, ScheduleItem, PlannerResponse.
//! Nothing here is persisted; every value lives for one request/response
//! cycle or one CLI session.

mod schedule;
mod task;

pub use schedule::{PlannerResponse, ScheduleItem};
pub use task::{Task, TaskList};
