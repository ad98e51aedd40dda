//! BMI, step and heart-rate calculations.
//!
//! Pure functions over caller-supplied values; no sensor capture here.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default daily step goal.
pub const DEFAULT_STEP_GOAL: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
}

/// Body mass index from weight in kilograms and height in centimetres.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Result<BmiResult, ValidationError> {
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "weight_kg".into(),
            message: "must be a positive number".into(),
        });
    }
    if !(height_cm.is_finite() && height_cm > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "height_cm".into(),
            message: "must be a positive number".into(),
        });
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    let category = if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::NormalWeight
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    };
    Ok(BmiResult { bmi, category })
}

/// Step count progress against the daily goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepProgress {
    pub step_count: u32,
    pub daily_goal: u32,
    pub progress_pct: f64,
    pub goal_reached: bool,
}

impl StepProgress {
    pub fn new(step_count: u32, daily_goal: u32) -> Result<Self, ValidationError> {
        if daily_goal == 0 {
            return Err(ValidationError::InvalidValue {
                field: "daily_goal".into(),
                message: "daily goal must be positive".into(),
            });
        }
        Ok(Self {
            step_count,
            daily_goal,
            progress_pct: (step_count as f64 / daily_goal as f64 * 100.0).min(100.0),
            goal_reached: step_count >= daily_goal,
        })
    }
}

/// Average/min/max over a run of heart-rate samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRateStats {
    pub average_bpm: u32,
    pub min_bpm: u32,
    pub max_bpm: u32,
    pub sample_count: usize,
}

pub fn heart_rate_stats(samples: &[u32]) -> Result<HeartRateStats, ValidationError> {
    if samples.is_empty() {
        return Err(ValidationError::Empty("heart rate samples"));
    }
    let sum: u64 = samples.iter().map(|&s| s as u64).sum();
    Ok(HeartRateStats {
        average_bpm: (sum / samples.len() as u64) as u32,
        min_bpm: *samples.iter().min().unwrap_or(&0),
        max_bpm: *samples.iter().max().unwrap_or(&0),
        sample_count: samples.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_categories_follow_thresholds() {
        assert_eq!(bmi(50.0, 175.0).unwrap().category, BmiCategory::Underweight);
        assert_eq!(bmi(70.0, 175.0).unwrap().category, BmiCategory::NormalWeight);
        assert_eq!(bmi(85.0, 175.0).unwrap().category, BmiCategory::Overweight);
        assert_eq!(bmi(100.0, 175.0).unwrap().category, BmiCategory::Obese);
    }

    #[test]
    fn bmi_value_matches_formula() {
        let r = bmi(70.0, 175.0).unwrap();
        assert!((r.bmi - 22.857).abs() < 0.01);
    }

    #[test]
    fn bmi_rejects_nonpositive_input() {
        assert!(bmi(0.0, 175.0).is_err());
        assert!(bmi(70.0, 0.0).is_err());
        assert!(bmi(f64::NAN, 175.0).is_err());
    }

    #[test]
    fn step_progress_caps_at_goal() {
        let p = StepProgress::new(12_000, DEFAULT_STEP_GOAL).unwrap();
        assert!(p.goal_reached);
        assert_eq!(p.progress_pct, 100.0);
        let p = StepProgress::new(5_000, DEFAULT_STEP_GOAL).unwrap();
        assert_eq!(p.progress_pct, 50.0);
    }

    #[test]
    fn heart_rate_stats_over_samples() {
        let stats = heart_rate_stats(&[72, 80, 64]).unwrap();
        assert_eq!(stats.average_bpm, 72);
        assert_eq!(stats.min_bpm, 64);
        assert_eq!(stats.max_bpm, 80);
        assert_eq!(stats.sample_count, 3);
        assert!(heart_rate_stats(&[]).is_err());
    }
}
