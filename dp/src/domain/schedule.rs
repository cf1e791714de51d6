//! Schedule entries and the planner result

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single time-stamped entry in a generated plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    /// Free-form clock time, e.g. "9:00 AM"
    pub time: String,

    pub task_description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ScheduleItem {
    pub fn new(time: impl Into<String>, task_description: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            task_description: task_description.into(),
            details: None,
            image_url: None,
        }
    }
}

/// The (schedule, explanation) pair returned by one planning request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerResponse {
    pub schedule: Vec<ScheduleItem>,
    pub explanation: String,
}

impl PlannerResponse {
    pub fn new(schedule: Vec<ScheduleItem>, explanation: impl Into<String>) -> Self {
        Self {
            schedule,
            explanation: explanation.into(),
        }
    }

    /// Distinct task descriptions in schedule order
    pub fn descriptions(&self) -> Vec<String> {
        debug!(item_count = %self.schedule.len(), "PlannerResponse::descriptions: called");
        let mut seen = Vec::new();
        for item in &self.schedule {
            if !seen.contains(&item.task_description) {
                seen.push(item.task_description.clone());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_item_serializes_camel_case() {
        let item = ScheduleItem::new("9:00 AM", "Breakfast");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["time"], "9:00 AM");
        assert_eq!(json["taskDescription"], "Breakfast");
        assert!(json.get("details").is_none());
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_schedule_item_with_image_url() {
        let mut item = ScheduleItem::new("1:00 PM", "Gym");
        item.image_url = Some("https://example.com/gym.png".to_string());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["imageUrl"], "https://example.com/gym.png");
    }

    #[test]
    fn test_descriptions_deduplicates_in_order() {
        let response = PlannerResponse::new(
            vec![
                ScheduleItem::new("9:00 AM", "Email"),
                ScheduleItem::new("10:00 AM", "Gym"),
                ScheduleItem::new("4:00 PM", "Email"),
            ],
            "x",
        );
        assert_eq!(response.descriptions(), vec!["Email", "Gym"]);
    }
}
