//! Synthetic training data generation
//!
//! Draws vital-sign samples from fixed-parameter Gaussians with a seeded RNG
//! and labels them with the deterministic rule. Samples are not clamped to
//! the serving-time validation bounds.

use crate::models::{RiskLabel, VitalSigns, NUM_CLASSES};
use crate::rule;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Default number of synthetic samples
pub const DEFAULT_SAMPLES: usize = 1000;

/// Default RNG seed for reproducible datasets
pub const DEFAULT_SEED: u64 = 42;

// Gaussian (mean, standard deviation) per vital
const HEART_RATE_DIST: (f64, f64) = (75.0, 15.0);
const BLOOD_PRESSURE_DIST: (f64, f64) = (120.0, 20.0);
const TEMPERATURE_DIST: (f64, f64) = (98.6, 1.5);
const OXYGEN_LEVEL_DIST: (f64, f64) = (97.0, 3.0);

/// Configuration for dataset synthesis
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub samples: usize,
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            seed: DEFAULT_SEED,
        }
    }
}

/// A labeled training set
#[derive(Debug, Clone)]
pub struct LabeledSet {
    pub vitals: Vec<VitalSigns>,
    pub labels: Vec<RiskLabel>,
}

impl LabeledSet {
    pub fn len(&self) -> usize {
        self.vitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vitals.is_empty()
    }

    /// Number of samples per class, indexed by ordinal label
    pub fn class_counts(&self) -> [usize; NUM_CLASSES] {
        let mut counts = [0usize; NUM_CLASSES];
        for label in &self.labels {
            counts[label.index()] += 1;
        }
        counts
    }
}

/// Generate a labeled dataset from the fixed vital-sign distributions
pub fn generate(config: &SynthConfig) -> LabeledSet {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let heart_rate = normal(HEART_RATE_DIST);
    let blood_pressure = normal(BLOOD_PRESSURE_DIST);
    let temperature = normal(TEMPERATURE_DIST);
    let oxygen_level = normal(OXYGEN_LEVEL_DIST);

    let mut vitals = Vec::with_capacity(config.samples);
    let mut labels = Vec::with_capacity(config.samples);

    for _ in 0..config.samples {
        let sample = VitalSigns::new(
            heart_rate.sample(&mut rng),
            blood_pressure.sample(&mut rng),
            temperature.sample(&mut rng),
            oxygen_level.sample(&mut rng),
        );
        labels.push(rule::score(&sample));
        vitals.push(sample);
    }

    LabeledSet { vitals, labels }
}

fn normal((mean, sd): (f64, f64)) -> Normal<f64> {
    Normal::new(mean, sd).expect("distribution parameters are finite")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count() {
        let set = generate(&SynthConfig {
            samples: 250,
            seed: 7,
        });
        assert_eq!(set.len(), 250);
        assert_eq!(set.labels.len(), 250);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let config = SynthConfig::default();
        let a = generate(&config);
        let b = generate(&config);
        assert_eq!(a.vitals, b.vitals);
        assert_eq!(a.labels, b.labels);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate(&SynthConfig {
            samples: 100,
            seed: 1,
        });
        let b = generate(&SynthConfig {
            samples: 100,
            seed: 2,
        });
        assert_ne!(a.vitals, b.vitals);
    }

    #[test]
    fn test_default_dataset_covers_all_classes() {
        let set = generate(&SynthConfig::default());
        let counts = set.class_counts();
        for (label, count) in RiskLabel::ALL.iter().zip(counts) {
            assert!(count > 0, "no samples labeled {}", label);
        }
        // Most of the population sits near the distribution means
        assert!(counts[RiskLabel::Low.index()] > counts[RiskLabel::High.index()]);
    }

    #[test]
    fn test_samples_cluster_near_means() {
        let set = generate(&SynthConfig::default());
        let mean_hr: f64 =
            set.vitals.iter().map(|v| v.heart_rate).sum::<f64>() / set.len() as f64;
        assert!((mean_hr - 75.0).abs() < 3.0, "mean heart rate was {}", mean_hr);
    }
}
