//! Core data types for patient risk prediction

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of vital-sign inputs consumed by the classifier
pub const NUM_FEATURES: usize = 4;

/// Number of risk classes produced by the classifier
pub const NUM_CLASSES: usize = 3;

/// Request field names, in validation order
pub const REQUIRED_FIELDS: [&str; NUM_FEATURES] = [
    "heart_rate",
    "blood_pressure",
    "temperature",
    "oxygen_level",
];

/// One set of patient vital-sign readings
///
/// Constructed fresh per request or per synthetic sample; carries no
/// identity. Values are unvalidated until they pass the scorer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// Heart rate in beats per minute
    pub heart_rate: f64,
    /// Systolic blood pressure in mmHg
    pub blood_pressure: f64,
    /// Body temperature in degrees Fahrenheit
    pub temperature: f64,
    /// Oxygen saturation in percent
    pub oxygen_level: f64,
}

impl VitalSigns {
    pub fn new(heart_rate: f64, blood_pressure: f64, temperature: f64, oxygen_level: f64) -> Self {
        Self {
            heart_rate,
            blood_pressure,
            temperature,
            oxygen_level,
        }
    }

    /// Feature array in the order the classifier was trained on
    pub fn as_features(&self) -> [f64; NUM_FEATURES] {
        [
            self.heart_rate,
            self.blood_pressure,
            self.temperature,
            self.oxygen_level,
        ]
    }
}

/// Categorical risk level, ordinally encoded 0..=2
///
/// Produced either by the deterministic rule (training ground truth) or by
/// the classifier (inference estimate); the two sources may disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl RiskLabel {
    /// All labels in ordinal order
    pub const ALL: [RiskLabel; NUM_CLASSES] = [RiskLabel::Low, RiskLabel::Medium, RiskLabel::High];

    /// Ordinal class index
    pub fn index(self) -> usize {
        match self {
            RiskLabel::Low => 0,
            RiskLabel::Medium => 1,
            RiskLabel::High => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<RiskLabel> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            RiskLabel::Low => "Low",
            RiskLabel::Medium => "Medium",
            RiskLabel::High => "High",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Class-probability triple; sums to 1.0 for any well-formed model output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskProbabilities {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl RiskProbabilities {
    pub fn from_array(probs: [f64; NUM_CLASSES]) -> Self {
        Self {
            low: probs[0],
            medium: probs[1],
            high: probs[2],
        }
    }

    pub fn get(&self, label: RiskLabel) -> f64 {
        match label {
            RiskLabel::Low => self.low,
            RiskLabel::Medium => self.medium,
            RiskLabel::High => self.high,
        }
    }
}

/// Result of scoring one set of vitals; returned once, never stored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub risk_level: RiskLabel,
    /// Probability of the chosen label
    pub confidence: f64,
    pub probabilities: RiskProbabilities,
}

/// Inclusive physiological bound for one vital-sign field
///
/// Values exactly at a bound are accepted; NaN fails `contains`.
#[derive(Debug, Clone, Copy)]
pub struct VitalBound {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
    /// Suffix appended to the bound in error messages (e.g. " F", "%")
    pub unit: &'static str,
}

impl VitalBound {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const HEART_RATE_BOUND: VitalBound = VitalBound {
    field: "heart_rate",
    min: 30.0,
    max: 200.0,
    unit: "",
};

pub const BLOOD_PRESSURE_BOUND: VitalBound = VitalBound {
    field: "blood_pressure",
    min: 50.0,
    max: 250.0,
    unit: "",
};

pub const TEMPERATURE_BOUND: VitalBound = VitalBound {
    field: "temperature",
    min: 90.0,
    max: 110.0,
    unit: " F",
};

pub const OXYGEN_LEVEL_BOUND: VitalBound = VitalBound {
    field: "oxygen_level",
    min: 70.0,
    max: 100.0,
    unit: "%",
};

/// Bounds in the same order as [`REQUIRED_FIELDS`]
pub const VITAL_BOUNDS: [VitalBound; NUM_FEATURES] = [
    HEART_RATE_BOUND,
    BLOOD_PRESSURE_BOUND,
    TEMPERATURE_BOUND,
    OXYGEN_LEVEL_BOUND,
];

/// Current UTC time as ISO-8601 with a trailing 'Z'
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
