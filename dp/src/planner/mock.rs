//! Mock schedule generator
//!
//! Deterministic keyword bucketing with no network calls. Only the hour
//! increment is random, and the caller supplies the RNG.

use rand::Rng;
use tracing::debug;

use crate::domain::{PlannerResponse, ScheduleItem, Task};

/// Fixed explanation for mock schedules
pub const MOCK_EXPLANATION: &str = "Your optimized schedule balances productivity with wellbeing. Work tasks are distributed to maximize focus periods, while meals and exercise are strategically placed to maintain energy throughout the day. Personal tasks are arranged to create a balanced daily flow.";

/// First hour of the day (24h clock)
const START_HOUR: u32 = 9;

/// Keyword bucket for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Exercise,
    Breakfast,
    Lunch,
    /// Dinner or any other meal
    Meal,
    Work,
    Other,
}

impl Bucket {
    /// Classify a description; each task lands in exactly one bucket
    pub fn classify(description: &str) -> Self {
        let d = description.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| d.contains(w));

        if has(&["exercise", "gym", "workout"]) {
            Bucket::Exercise
        } else if d.contains("breakfast") {
            Bucket::Breakfast
        } else if d.contains("lunch") {
            Bucket::Lunch
        } else if has(&["dinner", "eat"]) {
            Bucket::Meal
        } else if has(&["work", "meet", "call"]) {
            Bucket::Work
        } else {
            Bucket::Other
        }
    }
}

/// Order tasks into morning, midday and evening blocks
pub fn order_tasks(tasks: &[Task]) -> Vec<&Task> {
    debug!(task_count = %tasks.len(), "order_tasks: called");
    let of = |bucket: Bucket| -> Vec<&Task> {
        tasks
            .iter()
            .filter(|t| Bucket::classify(&t.description) == bucket)
            .collect()
    };

    let work = of(Bucket::Work);
    let other = of(Bucket::Other);
    let work_split = work.len().div_ceil(2);
    let other_first = other.len().div_ceil(3);
    let other_second = (2 * other.len()).div_ceil(3);

    let mut ordered = Vec::with_capacity(tasks.len());

    // Morning: breakfast, first half of work, first third of other
    ordered.extend(of(Bucket::Breakfast));
    ordered.extend(&work[..work_split]);
    ordered.extend(&other[..other_first]);

    // Midday: lunch, exercise, rest of work, second third of other
    ordered.extend(of(Bucket::Lunch));
    ordered.extend(of(Bucket::Exercise));
    ordered.extend(&work[work_split..]);
    ordered.extend(&other[other_first..other_second]);

    // Evening: remaining meals, last third of other
    ordered.extend(of(Bucket::Meal));
    ordered.extend(&other[other_second..]);

    ordered
}

/// Format a 24h hour as `H:00 AM|PM`, wrapping past midnight
pub fn format_hour(hour: u32) -> String {
    let hour = hour % 24;
    let (display, suffix) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{}:00 {}", display, suffix)
}

/// Generate a mock schedule with one entry per task
///
/// Starts at 9:00 AM and advances 1 or 2 hours per task.
pub fn generate_mock_schedule<R: Rng + ?Sized>(tasks: &[Task], rng: &mut R) -> PlannerResponse {
    debug!(task_count = %tasks.len(), "generate_mock_schedule: called");
    let mut hour = START_HOUR;
    let mut schedule = Vec::with_capacity(tasks.len());

    for task in order_tasks(tasks) {
        schedule.push(ScheduleItem::new(format_hour(hour), task.description.clone()));
        hour += rng.random_range(1..=2);
    }

    PlannerResponse::new(schedule, MOCK_EXPLANATION)
}
