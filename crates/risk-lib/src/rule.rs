//! Deterministic risk labeling rule
//!
//! Assigns ground-truth labels to synthetic training samples by accumulating
//! integer risk points per vital sign. Total and infallible for all real
//! inputs; never invoked at inference time.

use crate::models::{RiskLabel, VitalSigns};

/// Label a set of vitals by accumulated risk points
///
/// Each vital contributes points through nested mild/severe thresholds;
/// oxygen desaturation below 90% alone is enough for a Medium label.
pub fn score(vitals: &VitalSigns) -> RiskLabel {
    let points = risk_points(vitals);
    if points >= 4 {
        RiskLabel::High
    } else if points >= 2 {
        RiskLabel::Medium
    } else {
        RiskLabel::Low
    }
}

fn risk_points(v: &VitalSigns) -> u32 {
    let mut points = 0;

    // Heart rate: normal 60-100 bpm
    if v.heart_rate > 100.0 || v.heart_rate < 60.0 {
        points += 1;
    }
    if v.heart_rate > 120.0 || v.heart_rate < 50.0 {
        points += 1;
    }

    // Blood pressure: normal 90-140 mmHg
    if v.blood_pressure > 140.0 || v.blood_pressure < 90.0 {
        points += 1;
    }
    if v.blood_pressure > 160.0 || v.blood_pressure < 80.0 {
        points += 1;
    }

    // Temperature: normal 97-100 F
    if v.temperature > 100.0 || v.temperature < 97.0 {
        points += 1;
    }
    if v.temperature > 102.0 || v.temperature < 96.0 {
        points += 1;
    }

    // Oxygen saturation: hypoxia weighted more heavily
    if v.oxygen_level < 95.0 {
        points += 1;
    }
    if v.oxygen_level < 90.0 {
        points += 2;
    }

    points
}
