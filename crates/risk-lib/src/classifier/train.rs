//! Offline training: stratified split, standardization, gradient descent
//!
//! Fitting failures are fatal; training runs offline, once, interactively.

use super::{evaluate, softmax, EvalReport, FeatureScaler, SoftmaxClassifier};
use crate::models::{RiskLabel, NUM_CLASSES, NUM_FEATURES};
use crate::synth::LabeledSet;
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

/// Default bound on gradient-descent iterations
pub const DEFAULT_MAX_ITER: usize = 1000;

/// Default learning rate for full-batch gradient descent
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Default held-out fraction
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Training configuration
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Fraction of samples held out for evaluation
    pub test_fraction: f64,
    /// Upper bound on gradient-descent iterations
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Seed for the stratified shuffle
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            max_iter: DEFAULT_MAX_ITER,
            learning_rate: DEFAULT_LEARNING_RATE,
            seed: 42,
        }
    }
}

/// Fitted classifier plus its held-out evaluation
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub classifier: SoftmaxClassifier,
    pub report: EvalReport,
}

/// Fit a softmax classifier on a labeled dataset
///
/// Splits stratified by label, standardizes features on the training split,
/// then runs full-batch gradient descent on the cross-entropy loss for at
/// most `max_iter` iterations.
pub fn fit(data: &LabeledSet, config: &TrainConfig) -> Result<TrainOutcome> {
    if config.test_fraction <= 0.0 || config.test_fraction >= 1.0 {
        bail!("test_fraction must be in (0, 1), got {}", config.test_fraction);
    }
    if data.len() < NUM_CLASSES * 2 {
        bail!("dataset too small to split: {} samples", data.len());
    }

    let (train_idx, test_idx) = stratified_split(&data.labels, config.test_fraction, config.seed)?;

    let train_rows: Vec<[f64; NUM_FEATURES]> = train_idx
        .iter()
        .map(|&i| data.vitals[i].as_features())
        .collect();
    let scaler = FeatureScaler::fit(&train_rows);

    let x_train: Vec<[f64; NUM_FEATURES]> =
        train_rows.iter().map(|r| scaler.transform(*r)).collect();
    let y_train: Vec<usize> = train_idx.iter().map(|&i| data.labels[i].index()).collect();

    let (weights, bias) = gradient_descent(&x_train, &y_train, config);
    let classifier = SoftmaxClassifier::new(weights, bias, scaler);

    let truth: Vec<RiskLabel> = test_idx.iter().map(|&i| data.labels[i]).collect();
    let predicted: Vec<RiskLabel> = test_idx
        .iter()
        .map(|&i| classifier.predict(&data.vitals[i]))
        .collect();
    let report = evaluate(&predicted, &truth);

    info!(
        train_samples = train_idx.len(),
        test_samples = test_idx.len(),
        accuracy = report.accuracy,
        "Training complete"
    );

    Ok(TrainOutcome { classifier, report })
}

/// Per-class shuffled split keeping label proportions on both sides
fn stratified_split(
    labels: &[RiskLabel],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for label in RiskLabel::ALL {
        let mut indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == label)
            .map(|(i, _)| i)
            .collect();

        if indices.len() < 2 {
            bail!(
                "degenerate split: class {} has {} sample(s), need at least 2",
                label,
                indices.len()
            );
        }

        indices.shuffle(&mut rng);
        let n_test = ((indices.len() as f64 * test_fraction).round() as usize)
            .clamp(1, indices.len() - 1);
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    Ok((train, test))
}

/// Full-batch gradient descent on softmax cross-entropy
fn gradient_descent(
    x: &[[f64; NUM_FEATURES]],
    y: &[usize],
    config: &TrainConfig,
) -> ([[f64; NUM_FEATURES]; NUM_CLASSES], [f64; NUM_CLASSES]) {
    let n = x.len() as f64;
    let mut weights = [[0.0; NUM_FEATURES]; NUM_CLASSES];
    let mut bias = [0.0; NUM_CLASSES];

    for _ in 0..config.max_iter {
        let mut grad_w = [[0.0; NUM_FEATURES]; NUM_CLASSES];
        let mut grad_b = [0.0; NUM_CLASSES];

        for (row, &target) in x.iter().zip(y) {
            let mut logits = bias;
            for (logit, w_row) in logits.iter_mut().zip(&weights) {
                for (w, xi) in w_row.iter().zip(row) {
                    *logit += w * xi;
                }
            }
            let probs = softmax(logits);

            for c in 0..NUM_CLASSES {
                let err = probs[c] - if c == target { 1.0 } else { 0.0 };
                for (g, xi) in grad_w[c].iter_mut().zip(row) {
                    *g += err * xi;
                }
                grad_b[c] += err;
            }
        }

        let step = config.learning_rate / n;
        for c in 0..NUM_CLASSES {
            for (w, g) in weights[c].iter_mut().zip(&grad_w[c]) {
                *w -= step * g;
            }
            bias[c] -= step * grad_b[c];
        }
    }

    (weights, bias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VitalSigns;
    use crate::synth::{generate, SynthConfig};

    fn default_dataset() -> LabeledSet {
        generate(&SynthConfig::default())
    }

    #[test]
    fn test_fit_reaches_reasonable_accuracy() {
        let data = default_dataset();
        let outcome = fit(&data, &TrainConfig::default()).unwrap();
        assert!(
            outcome.report.accuracy > 0.75,
            "held-out accuracy was {}",
            outcome.report.accuracy
        );
    }

    #[test]
    fn test_fit_is_deterministic() {
        let data = default_dataset();
        let config = TrainConfig::default();
        let a = fit(&data, &config).unwrap();
        let b = fit(&data, &config).unwrap();
        assert_eq!(a.classifier, b.classifier);
        assert_eq!(a.report.accuracy, b.report.accuracy);
    }

    #[test]
    fn test_fitted_model_classifies_nominal_vitals_low() {
        let data = default_dataset();
        let outcome = fit(&data, &TrainConfig::default()).unwrap();
        let label = outcome
            .classifier
            .predict(&VitalSigns::new(75.0, 120.0, 98.6, 98.0));
        assert_eq!(label, RiskLabel::Low);
    }

    #[test]
    fn test_probabilities_sum_to_one_after_fit() {
        let data = default_dataset();
        let outcome = fit(&data, &TrainConfig::default()).unwrap();
        for vitals in [
            VitalSigns::new(75.0, 120.0, 98.6, 98.0),
            VitalSigns::new(130.0, 170.0, 103.0, 88.0),
            VitalSigns::new(200.0, 250.0, 110.0, 70.0),
        ] {
            let probs = outcome.classifier.predict_proba(&vitals);
            let sum: f64 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "sum was {}", sum);
        }
    }

    #[test]
    fn test_single_class_dataset_fails() {
        let vitals: Vec<VitalSigns> = (0..50)
            .map(|i| VitalSigns::new(70.0 + i as f64 * 0.1, 120.0, 98.6, 98.0))
            .collect();
        let labels = vec![RiskLabel::Low; vitals.len()];
        let data = LabeledSet { vitals, labels };

        let err = fit(&data, &TrainConfig::default()).unwrap_err();
        assert!(err.to_string().contains("degenerate split"), "error: {}", err);
    }

    #[test]
    fn test_invalid_test_fraction_fails() {
        let data = default_dataset();
        let config = TrainConfig {
            test_fraction: 1.5,
            ..TrainConfig::default()
        };
        assert!(fit(&data, &config).is_err());
    }

    #[test]
    fn test_split_is_stratified() {
        let data = default_dataset();
        let (train, test) =
            stratified_split(&data.labels, DEFAULT_TEST_FRACTION, 42).unwrap();
        assert_eq!(train.len() + test.len(), data.len());

        // Every class appears on both sides of the split
        for label in RiskLabel::ALL {
            assert!(train.iter().any(|&i| data.labels[i] == label));
            assert!(test.iter().any(|&i| data.labels[i] == label));
        }
    }
}
