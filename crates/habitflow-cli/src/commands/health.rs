//! Health calculators: BMI, steps, heart rate.

use clap::Subcommand;

use habitflow_core::health::{bmi, heart_rate_stats, StepProgress};
use habitflow_core::Config;

#[derive(Subcommand)]
pub enum HealthAction {
    /// Body mass index from weight and height
    Bmi {
        /// Weight in kilograms
        weight_kg: f64,
        /// Height in centimetres
        height_cm: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a step count against the daily goal
    Steps {
        /// Steps taken today
        count: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarise heart-rate samples
    Heart {
        /// Comma-separated BPM samples, e.g. 72,80,64
        samples: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: HealthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        HealthAction::Bmi {
            weight_kg,
            height_cm,
            json,
        } => {
            let result = bmi(weight_kg, height_cm)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("BMI {:.1} — {}", result.bmi, result.category.label());
            }
        }
        HealthAction::Steps { count, json } => {
            let config = Config::load_or_default();
            let progress = StepProgress::new(count, config.steps.daily_goal)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else {
                println!(
                    "{} / {} steps ({:.0}%){}",
                    progress.step_count,
                    progress.daily_goal,
                    progress.progress_pct,
                    if progress.goal_reached { " — goal reached" } else { "" }
                );
            }
        }
        HealthAction::Heart { samples, json } => {
            let parsed: Vec<u32> = samples
                .split(',')
                .map(|s| s.trim().parse::<u32>())
                .collect::<Result<_, _>>()
                .map_err(|_| format!("invalid samples '{samples}': expected comma-separated numbers"))?;
            let stats = heart_rate_stats(&parsed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "avg {} bpm (min {} / max {}) over {} samples",
                    stats.average_bpm, stats.min_bpm, stats.max_bpm, stats.sample_count
                );
            }
        }
    }
    Ok(())
}
