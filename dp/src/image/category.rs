//! Keyword categories for task images
//!
//! A category drives both the placeholder fallback (colour plus label) and
//! the visual concept phrase added to the image prompt.

use tracing::debug;

/// Placeholder image host
const PLACEHOLDER_BASE: &str = "https://placehold.co/600x400";

/// Task category derived from description keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Work,
    Meeting,
    Study,
    Exercise,
    Food,
    Shopping,
    Cleaning,
    Relaxation,
    Sleep,
    Travel,
    Entertainment,
    Social,
    Health,
    Default,
}

/// Keyword table, searched in order for substring matches
const KEYWORDS: &[(&str, Category)] = &[
    ("work", Category::Work),
    ("job", Category::Work),
    ("project", Category::Work),
    ("email", Category::Work),
    ("report", Category::Work),
    ("office", Category::Work),
    ("business", Category::Work),
    ("meeting", Category::Meeting),
    ("call", Category::Meeting),
    ("presentation", Category::Meeting),
    ("conference", Category::Meeting),
    ("zoom", Category::Meeting),
    ("interview", Category::Meeting),
    ("study", Category::Study),
    ("read", Category::Study),
    ("learn", Category::Study),
    ("homework", Category::Study),
    ("research", Category::Study),
    ("class", Category::Study),
    ("book", Category::Study),
    ("lecture", Category::Study),
    ("exercise", Category::Exercise),
    ("workout", Category::Exercise),
    ("gym", Category::Exercise),
    ("run", Category::Exercise),
    ("jog", Category::Exercise),
    ("fitness", Category::Exercise),
    ("sport", Category::Exercise),
    ("training", Category::Exercise),
    ("eat", Category::Food),
    ("lunch", Category::Food),
    ("dinner", Category::Food),
    ("breakfast", Category::Food),
    ("cook", Category::Food),
    ("meal", Category::Food),
    ("food", Category::Food),
    ("restaurant", Category::Food),
    ("shop", Category::Shopping),
    ("buy", Category::Shopping),
    ("purchase", Category::Shopping),
    ("store", Category::Shopping),
    ("mall", Category::Shopping),
    ("grocery", Category::Shopping),
    ("market", Category::Shopping),
    ("clean", Category::Cleaning),
    ("laundry", Category::Cleaning),
    ("wash", Category::Cleaning),
    ("dishes", Category::Cleaning),
    ("tidy", Category::Cleaning),
    ("organize", Category::Cleaning),
    ("dust", Category::Cleaning),
    ("vacuum", Category::Cleaning),
    ("relax", Category::Relaxation),
    ("rest", Category::Relaxation),
    ("break", Category::Relaxation),
    ("meditate", Category::Relaxation),
    ("yoga", Category::Relaxation),
    ("sleep", Category::Sleep),
    ("nap", Category::Sleep),
    ("bed", Category::Sleep),
    ("travel", Category::Travel),
    ("trip", Category::Travel),
    ("drive", Category::Travel),
    ("commute", Category::Travel),
    ("flight", Category::Travel),
    ("journey", Category::Travel),
    ("vacation", Category::Travel),
    ("play", Category::Entertainment),
    ("game", Category::Entertainment),
    ("movie", Category::Entertainment),
    ("watch", Category::Entertainment),
    ("tv", Category::Entertainment),
    ("show", Category::Entertainment),
    ("entertainment", Category::Entertainment),
    ("friend", Category::Social),
    ("party", Category::Social),
    ("visit", Category::Social),
    ("meet", Category::Social),
    ("date", Category::Social),
    ("family", Category::Social),
    ("doctor", Category::Health),
    ("appointment", Category::Health),
    ("medicine", Category::Health),
    ("therapy", Category::Health),
    ("dentist", Category::Health),
    ("checkup", Category::Health),
];

impl Category {
    /// Categorise a task description
    ///
    /// Whole words are tried first (letters only), then any keyword
    /// appearing inside the description.
    pub fn for_description(description: &str) -> Self {
        debug!(%description, "Category::for_description: called");
        let normalized = description.to_lowercase();

        for word in normalized.split_whitespace() {
            let clean: String = word.chars().filter(|c| c.is_ascii_lowercase()).collect();
            if clean.is_empty() {
                continue;
            }
            if let Some((_, category)) = KEYWORDS.iter().find(|(k, _)| *k == clean) {
                debug!(?category, %clean, "Category::for_description: word match");
                return *category;
            }
        }

        if let Some((keyword, category)) = KEYWORDS.iter().find(|(k, _)| normalized.contains(k)) {
            debug!(?category, %keyword, "Category::for_description: substring match");
            return *category;
        }

        Category::Default
    }

    /// Hex colour without the leading `#`
    pub fn color(&self) -> &'static str {
        match self {
            Category::Work | Category::Sleep | Category::Default => "6366f1",
            Category::Meeting => "8b5cf6",
            Category::Study => "a78bfa",
            Category::Exercise => "10b981",
            Category::Food | Category::Social => "f59e0b",
            Category::Shopping | Category::Entertainment => "ec4899",
            Category::Cleaning => "06b6d4",
            Category::Relaxation => "3b82f6",
            Category::Travel => "f97316",
            Category::Health => "14b8a6",
        }
    }

    /// Upper-case text shown on the placeholder
    pub fn label(&self) -> &'static str {
        match self {
            Category::Work => "WORK",
            Category::Meeting => "MEET",
            Category::Study => "STUDY",
            Category::Exercise => "GYM",
            Category::Food => "FOOD",
            Category::Shopping => "SHOP",
            Category::Cleaning => "CLEAN",
            Category::Relaxation => "RELAX",
            Category::Sleep => "SLEEP",
            Category::Travel => "TRAVEL",
            Category::Entertainment => "FUN",
            Category::Social => "SOCIAL",
            Category::Health => "HEALTH",
            Category::Default => "TASK",
        }
    }

    /// Visual concept for the image prompt; `None` for uncategorised tasks
    pub fn concept(&self) -> Option<&'static str> {
        let concept = match self {
            Category::Work => "a briefcase or a laptop",
            Category::Meeting => "a group of simple figures around a table",
            Category::Study => "an open book",
            Category::Exercise => "a dumbbell or a running figure",
            Category::Food => "a plate with a fork and knife",
            Category::Shopping => "a shopping cart",
            Category::Cleaning => "a broom and sparkles",
            Category::Relaxation => "a figure sitting in a calm pose",
            Category::Sleep => "a crescent moon over a bed",
            Category::Travel => "a suitcase or an airplane",
            Category::Entertainment => "a game controller or a film reel",
            Category::Social => "two smiling faces",
            Category::Health => "a medical cross or a heart",
            Category::Default => return None,
        };
        Some(concept)
    }
}

/// Deterministic placeholder URL for a task
pub fn fallback_image_url(description: &str) -> String {
    let category = Category::for_description(description);
    format!(
        "{}/{}/white?text={}",
        PLACEHOLDER_BASE,
        category.color(),
        urlencoding::encode(category.label())
    )
}
