//! Multinomial softmax classifier over vital-sign features
//!
//! Training produces a [`SoftmaxClassifier`]; `save`/`load` move it through a
//! JSON artifact whose parameter block is checksum-validated before use. The
//! model has fixed input arity 4 and output cardinality 3, enforced by the
//! parameter shapes.

mod metrics;
mod train;

pub use metrics::{evaluate, ClassMetrics, EvalReport};
pub use train::{
    fit, TrainConfig, TrainOutcome, DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITER, DEFAULT_TEST_FRACTION,
};

use crate::models::{
    utc_timestamp, RiskLabel, RiskProbabilities, ScoredResult, VitalSigns, NUM_CLASSES,
    NUM_FEATURES,
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Artifact format version understood by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Per-feature z-score scaler, fitted on the training split only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    mean: [f64; NUM_FEATURES],
    std: [f64; NUM_FEATURES],
}

impl FeatureScaler {
    /// Fit mean and standard deviation per feature column
    pub fn fit(rows: &[[f64; NUM_FEATURES]]) -> Self {
        let n = rows.len().max(1) as f64;
        let mut mean = [0.0; NUM_FEATURES];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut std = [0.0; NUM_FEATURES];
        for row in rows {
            for ((s, x), m) in std.iter_mut().zip(row).zip(&mean) {
                *s += (x - m).powi(2);
            }
        }
        for s in &mut std {
            *s = (*s / n).sqrt();
            // A constant column would divide by zero downstream
            if *s < f64::EPSILON {
                *s = 1.0;
            }
        }

        Self { mean, std }
    }

    pub fn transform(&self, features: [f64; NUM_FEATURES]) -> [f64; NUM_FEATURES] {
        let mut out = [0.0; NUM_FEATURES];
        for i in 0..NUM_FEATURES {
            out[i] = (features[i] - self.mean[i]) / self.std[i];
        }
        out
    }
}

/// Fitted multinomial logistic model: 4 inputs, 3 classes
///
/// Inference is pure arithmetic over immutable parameters, so one instance
/// may be shared across threads behind an `Arc` without locking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxClassifier {
    weights: [[f64; NUM_FEATURES]; NUM_CLASSES],
    bias: [f64; NUM_CLASSES],
    scaler: FeatureScaler,
}

impl SoftmaxClassifier {
    pub(crate) fn new(
        weights: [[f64; NUM_FEATURES]; NUM_CLASSES],
        bias: [f64; NUM_CLASSES],
        scaler: FeatureScaler,
    ) -> Self {
        Self {
            weights,
            bias,
            scaler,
        }
    }

    /// Class-probability triple for one set of vitals
    pub fn predict_proba(&self, vitals: &VitalSigns) -> [f64; NUM_CLASSES] {
        let x = self.scaler.transform(vitals.as_features());
        let mut logits = self.bias;
        for (logit, row) in logits.iter_mut().zip(&self.weights) {
            for (w, xi) in row.iter().zip(&x) {
                *logit += w * xi;
            }
        }
        softmax(logits)
    }

    /// Most probable risk label
    pub fn predict(&self, vitals: &VitalSigns) -> RiskLabel {
        RiskLabel::ALL[argmax(&self.predict_proba(vitals))]
    }

    /// Full scored result: label, confidence, probability triple
    pub fn score(&self, vitals: &VitalSigns) -> ScoredResult {
        let probs = self.predict_proba(vitals);
        let idx = argmax(&probs);
        ScoredResult {
            risk_level: RiskLabel::ALL[idx],
            confidence: probs[idx],
            probabilities: RiskProbabilities::from_array(probs),
        }
    }

    /// Persist the model as a single JSON artifact with embedded checksum
    pub fn save(&self, path: &Path) -> Result<()> {
        let params_json =
            serde_json::to_string(self).context("Failed to serialize model parameters")?;
        let artifact = ModelArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            trained_at: utc_timestamp(),
            checksum: sha256_hex(params_json.as_bytes()),
            params: self.clone(),
        };
        let json = serde_json::to_string_pretty(&artifact)
            .context("Failed to serialize model artifact")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write model artifact {}", path.display()))?;
        Ok(())
    }

    /// Load and checksum-validate a persisted model artifact
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
        let artifact: ModelArtifact =
            serde_json::from_str(&raw).context("Failed to parse model artifact")?;

        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            bail!(
                "Unsupported model artifact format version {} (expected {})",
                artifact.format_version,
                ARTIFACT_FORMAT_VERSION
            );
        }

        let params_json = serde_json::to_string(&artifact.params)
            .context("Failed to serialize model parameters")?;
        let checksum = sha256_hex(params_json.as_bytes());
        if checksum != artifact.checksum {
            bail!(
                "Model artifact checksum mismatch (expected {}, computed {})",
                artifact.checksum,
                checksum
            );
        }

        Ok(artifact.params)
    }
}

/// On-disk artifact wrapper around the model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    trained_at: String,
    checksum: String,
    params: SoftmaxClassifier,
}

/// Numerically stable softmax
fn softmax(logits: [f64; NUM_CLASSES]) -> [f64; NUM_CLASSES] {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut out = [0.0; NUM_CLASSES];
    let mut sum = 0.0;
    for (o, logit) in out.iter_mut().zip(&logits) {
        *o = (logit - max).exp();
        sum += *o;
    }
    for o in &mut out {
        *o /= sum;
    }
    out
}

fn argmax(probs: &[f64; NUM_CLASSES]) -> usize {
    let mut best = 0;
    for i in 1..NUM_CLASSES {
        if probs[i] > probs[best] {
            best = i;
        }
    }
    best
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_scaler() -> FeatureScaler {
        FeatureScaler {
            mean: [0.0; NUM_FEATURES],
            std: [1.0; NUM_FEATURES],
        }
    }

    fn one_hot_classifier() -> SoftmaxClassifier {
        // Each class keyed to one feature
        SoftmaxClassifier::new(
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
            [0.0; NUM_CLASSES],
            identity_scaler(),
        )
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax([1.0, 2.0, 3.0]);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(probs.iter().all(|p| *p > 0.0));
    }

    #[test]
    fn test_softmax_is_shift_stable() {
        let a = softmax([1.0, 2.0, 3.0]);
        let b = softmax([1001.0, 1002.0, 1003.0]);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_predict_follows_dominant_logit() {
        let clf = one_hot_classifier();
        let vitals = VitalSigns::new(10.0, 0.0, 0.0, 0.0);
        assert_eq!(clf.predict(&vitals), RiskLabel::Low);
        let vitals = VitalSigns::new(0.0, 0.0, 10.0, 0.0);
        assert_eq!(clf.predict(&vitals), RiskLabel::High);
    }

    #[test]
    fn test_score_confidence_matches_chosen_probability() {
        let clf = one_hot_classifier();
        let result = clf.score(&VitalSigns::new(3.0, 1.0, 0.0, 0.0));
        assert_eq!(result.confidence, result.probabilities.get(result.risk_level));
        let sum = result.probabilities.low + result.probabilities.medium + result.probabilities.high;
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let clf = one_hot_classifier();
        let vitals = VitalSigns::new(1.5, -0.5, 2.0, 0.25);
        assert_eq!(clf.predict_proba(&vitals), clf.predict_proba(&vitals));
    }

    #[test]
    fn test_scaler_fit_and_transform() {
        let rows = [
            [1.0, 10.0, 100.0, 5.0],
            [3.0, 10.0, 300.0, 5.0],
        ];
        let scaler = FeatureScaler::fit(&rows);
        let z = scaler.transform([2.0, 10.0, 200.0, 5.0]);
        // Column means map to zero; constant columns keep unit scale
        for v in z {
            assert!(v.abs() < 1e-9, "expected zero, got {}", v);
        }
        let z = scaler.transform([3.0, 10.0, 100.0, 5.0]);
        assert!((z[0] - 1.0).abs() < 1e-9);
        assert!((z[2] + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_artifact_round_trip() {
        let clf = one_hot_classifier();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        clf.save(&path).unwrap();
        let loaded = SoftmaxClassifier::load(&path).unwrap();

        assert_eq!(clf, loaded);
        let vitals = VitalSigns::new(0.3, 0.1, 0.9, 0.2);
        assert_eq!(clf.predict_proba(&vitals), loaded.predict_proba(&vitals));
    }

    #[test]
    fn test_tampered_artifact_fails_checksum() {
        let clf = one_hot_classifier();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        clf.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let tampered = raw.replacen("1.0", "2.0", 1);
        assert_ne!(raw, tampered, "tampering should change the artifact");
        std::fs::write(&path, tampered).unwrap();

        let err = SoftmaxClassifier::load(&path).unwrap_err();
        assert!(err.to_string().contains("checksum"), "error was: {}", err);
    }

    #[test]
    fn test_missing_artifact_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SoftmaxClassifier::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
