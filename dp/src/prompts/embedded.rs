//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.
//! The schedule prompt's wording is part of the provider contract: the
//! reply parser depends on the `EXPLANATION:` / `SCHEDULE:` format it asks for.

use tracing::debug;

/// Daily schedule prompt
pub const SCHEDULE: &str = include_str!("../../prompts/schedule.pmt");

/// Task icon prompt
pub const IMAGE: &str = include_str!("../../prompts/image.pmt");

/// System prompt sent alongside the schedule prompt
pub const SCHEDULE_SYSTEM: &str =
    "You are a helpful assistant that helps users organize and optimize their daily tasks into a schedule.";

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "schedule" => Some(SCHEDULE),
        "image" => Some(IMAGE),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_schedule() {
        let schedule = get_embedded("schedule").unwrap();
        assert!(schedule.contains("Given these tasks:"));
        assert!(schedule.contains("EXPLANATION:"));
        assert!(schedule.contains("SCHEDULE:"));
        assert!(schedule.contains("[Time]: [Task description with category-specific words]"));
    }

    #[test]
    fn test_get_embedded_image() {
        let image = get_embedded("image").unwrap();
        assert!(image.contains("NO TEXT OR WRITING"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
