//! Mood journal entries and the built-in mood palette.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: i64,
    pub mood: String,
    pub emoji: String,
    #[serde(default)]
    pub note: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodOption {
    pub emoji: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// The selectable moods, in display order.
pub const MOOD_OPTIONS: &[MoodOption] = &[
    MoodOption { emoji: "😊", name: "Happy", description: "Feeling great and positive" },
    MoodOption { emoji: "😢", name: "Sad", description: "Feeling down or upset" },
    MoodOption { emoji: "😡", name: "Angry", description: "Feeling frustrated or mad" },
    MoodOption { emoji: "😴", name: "Tired", description: "Feeling exhausted or sleepy" },
    MoodOption { emoji: "😌", name: "Calm", description: "Feeling peaceful and relaxed" },
    MoodOption { emoji: "😰", name: "Anxious", description: "Feeling worried or nervous" },
    MoodOption { emoji: "🤩", name: "Excited", description: "Feeling enthusiastic and eager" },
    MoodOption { emoji: "😔", name: "Disappointed", description: "Feeling let down" },
    MoodOption { emoji: "😎", name: "Confident", description: "Feeling self-assured" },
    MoodOption { emoji: "🤒", name: "Sick", description: "Feeling unwell or ill" },
    MoodOption { emoji: "😍", name: "Loved", description: "Feeling loved and appreciated" },
    MoodOption { emoji: "🤔", name: "Thoughtful", description: "Deep in thought" },
];

/// Look up a mood option by name, case-insensitively.
pub fn mood_option(name: &str) -> Option<&'static MoodOption> {
    MOOD_OPTIONS
        .iter()
        .find(|o| o.name.eq_ignore_ascii_case(name))
}

/// Per-mood entry counts, ordered by mood name.
pub fn mood_summary(entries: &[MoodEntry]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.mood.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_lookup_is_case_insensitive() {
        assert_eq!(mood_option("happy").unwrap().emoji, "😊");
        assert_eq!(mood_option("HAPPY").unwrap().name, "Happy");
        assert!(mood_option("grumpy").is_none());
    }

    #[test]
    fn summary_counts_per_mood() {
        let entry = |mood: &str| MoodEntry {
            id: 0,
            mood: mood.to_string(),
            emoji: String::new(),
            note: String::new(),
            at: Utc::now(),
        };
        let entries = vec![entry("Happy"), entry("Sad"), entry("Happy")];
        let summary = mood_summary(&entries);
        assert_eq!(summary["Happy"], 2);
        assert_eq!(summary["Sad"], 1);
    }
}
