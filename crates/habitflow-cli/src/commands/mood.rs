//! Mood journal commands.

use chrono::Utc;
use clap::Subcommand;

use habitflow_core::mood::{mood_option, mood_summary, MOOD_OPTIONS};
use habitflow_core::Database;

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record how you feel
    Log {
        /// Mood name (see `mood options`)
        mood: String,
        /// Optional note
        #[arg(long, default_value = "")]
        note: String,
    },
    /// List the selectable moods
    Options,
    /// Show recent entries
    History {
        /// Maximum entries to show
        #[arg(long, default_value = "20")]
        limit: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Per-mood entry counts
    Summary,
    /// Delete an entry
    Delete {
        /// Entry ID
        id: i64,
    },
}

pub fn run(action: MoodAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        MoodAction::Log { mood, note } => {
            let Some(option) = mood_option(&mood) else {
                return Err(format!(
                    "unknown mood '{mood}' (see `habitflow-cli mood options`)"
                )
                .into());
            };
            let id = db.log_mood(option.name, option.emoji, &note, Utc::now())?;
            println!("mood saved: {} {} (entry {id})", option.emoji, option.name);
        }
        MoodAction::Options => {
            for o in MOOD_OPTIONS {
                println!("{}  {:<13} {}", o.emoji, o.name, o.description);
            }
        }
        MoodAction::History { limit, json } => {
            let entries = db.list_moods(Some(limit))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("no mood entries");
            } else {
                for e in entries {
                    let note = if e.note.is_empty() {
                        String::new()
                    } else {
                        format!("  — {}", e.note)
                    };
                    println!(
                        "{}  {} {}{note}",
                        e.at.format("%Y-%m-%d %H:%M"),
                        e.emoji,
                        e.mood
                    );
                }
            }
        }
        MoodAction::Summary => {
            let entries = db.list_moods(None)?;
            let summary = mood_summary(&entries);
            if summary.is_empty() {
                println!("no mood entries");
            } else {
                for (mood, count) in summary {
                    println!("{mood}: {count}");
                }
            }
        }
        MoodAction::Delete { id } => {
            db.delete_mood(id)?;
            println!("entry {id} deleted");
        }
    }
    Ok(())
}
