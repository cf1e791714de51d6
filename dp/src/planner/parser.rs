//! Reply parser
//!
//! Best-effort extraction of an explanation and a schedule from the
//! provider's free text. Lines that do not start with a time token are
//! dropped without error.

use regex::Regex;
use tracing::debug;

use crate::domain::{PlannerResponse, ScheduleItem};
use crate::error::PlannerError;

/// Explanation used when the reply has none
pub const DEFAULT_EXPLANATION: &str = "Schedule optimized based on task requirements.";

// markers count only at the start of a line
const EXPLANATION_PATTERN: &str = r"(?ism)^[ \t]*EXPLANATION:\s*(.*?)(?:^[ \t]*SCHEDULE:|\z)";
const SCHEDULE_PATTERN: &str = r"(?ism)^[ \t]*SCHEDULE:(.*)\z";
// optional bullet, time token (H, H:MM, optional AM/PM ending at a word boundary or a dot),
// optional dash or colon separator, description
const LINE_PATTERN: &str =
    r"(?i)^\s*(?:[-*•]\s*)?(\d{1,2}(?::\d{2})?(?:\s*[AP]\.?M(?:\.|\b))?)\s*[-:–—]?\s*(.*\S)\s*$";

/// Compiled patterns for parsing provider replies
#[derive(Debug, Clone)]
pub struct ScheduleParser {
    explanation: Regex,
    schedule: Regex,
    line: Regex,
}

impl ScheduleParser {
    pub fn new() -> Result<Self, PlannerError> {
        debug!("ScheduleParser::new: called");
        let compile = |pattern: &str| Regex::new(pattern).map_err(|e| PlannerError::Parse(e.to_string()));
        Ok(Self {
            explanation: compile(EXPLANATION_PATTERN)?,
            schedule: compile(SCHEDULE_PATTERN)?,
            line: compile(LINE_PATTERN)?,
        })
    }

    /// Parse a full reply into a planner response
    ///
    /// A missing `SCHEDULE:` section yields an empty schedule; callers decide
    /// whether that is acceptable.
    pub fn parse(&self, text: &str) -> PlannerResponse {
        debug!(text_len = text.len(), "ScheduleParser::parse: called");
        let explanation = self
            .explanation
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());

        let schedule = match self.schedule.captures(text).and_then(|c| c.get(1)) {
            Some(section) => section.as_str().lines().filter_map(|line| self.parse_line(line)).collect(),
            None => {
                debug!("ScheduleParser::parse: no SCHEDULE section");
                Vec::new()
            }
        };

        PlannerResponse { schedule, explanation }
    }

    /// Parse one schedule line; `None` when it has no leading time token
    pub fn parse_line(&self, line: &str) -> Option<ScheduleItem> {
        if line.trim().is_empty() {
            return None;
        }
        let Some(caps) = self.line.captures(line) else {
            debug!(%line, "ScheduleParser::parse_line: no time token, dropping");
            return None;
        };

        let time = caps.get(1)?.as_str().trim();
        let description = caps.get(2)?.as_str().trim();
        if time.is_empty() || !description.chars().any(char::is_alphanumeric) {
            return None;
        }

        Some(ScheduleItem::new(time, description))
    }
}

/// Parse a reply with a freshly compiled parser
pub fn parse_response(text: &str) -> Result<PlannerResponse, PlannerError> {
    Ok(ScheduleParser::new()?.parse(text))
}
