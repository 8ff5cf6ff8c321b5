//! Held-out evaluation metrics
//!
//! Accuracy and per-class precision/recall/F1 derived from the confusion
//! matrix of the test split.

use crate::models::{RiskLabel, NUM_CLASSES};
use serde::Serialize;

/// Precision/recall/F1 for one risk class
#[derive(Debug, Clone, Serialize)]
pub struct ClassMetrics {
    pub label: RiskLabel,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true samples of this class in the test split
    pub support: usize,
}

/// Classification report over the held-out split
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
    pub test_samples: usize,
}

/// Compute the classification report from predictions and ground truth
pub fn evaluate(predicted: &[RiskLabel], truth: &[RiskLabel]) -> EvalReport {
    debug_assert_eq!(predicted.len(), truth.len());

    // confusion[truth][predicted]
    let mut confusion = [[0usize; NUM_CLASSES]; NUM_CLASSES];
    for (pred, actual) in predicted.iter().zip(truth) {
        confusion[actual.index()][pred.index()] += 1;
    }

    let total = truth.len();
    let correct: usize = (0..NUM_CLASSES).map(|c| confusion[c][c]).sum();
    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };

    let classes = RiskLabel::ALL
        .iter()
        .map(|&label| {
            let c = label.index();
            let tp = confusion[c][c];
            let predicted_c: usize = (0..NUM_CLASSES).map(|t| confusion[t][c]).sum();
            let actual_c: usize = confusion[c].iter().sum();

            let precision = ratio(tp, predicted_c);
            let recall = ratio(tp, actual_c);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            ClassMetrics {
                label,
                precision,
                recall,
                f1,
                support: actual_c,
            }
        })
        .collect();

    EvalReport {
        accuracy,
        classes,
        test_samples: total,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RiskLabel::{High, Low, Medium};

    #[test]
    fn test_perfect_predictions() {
        let truth = [Low, Medium, High, Low, Medium, High];
        let report = evaluate(&truth, &truth);

        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.test_samples, 6);
        for class in &report.classes {
            assert_eq!(class.precision, 1.0);
            assert_eq!(class.recall, 1.0);
            assert_eq!(class.f1, 1.0);
            assert_eq!(class.support, 2);
        }
    }

    #[test]
    fn test_known_confusion() {
        // One Medium sample misread as Low
        let truth = [Low, Low, Medium, Medium, High];
        let predicted = [Low, Low, Low, Medium, High];
        let report = evaluate(&predicted, &truth);

        assert!((report.accuracy - 0.8).abs() < 1e-9);

        let low = &report.classes[Low.index()];
        assert!((low.precision - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(low.recall, 1.0);

        let medium = &report.classes[Medium.index()];
        assert_eq!(medium.precision, 1.0);
        assert!((medium.recall - 0.5).abs() < 1e-9);
        assert_eq!(medium.support, 2);
    }

    #[test]
    fn test_absent_class_scores_zero() {
        let truth = [Low, Low, Low];
        let predicted = [Low, Low, Low];
        let report = evaluate(&predicted, &truth);

        let high = &report.classes[High.index()];
        assert_eq!(high.precision, 0.0);
        assert_eq!(high.recall, 0.0);
        assert_eq!(high.f1, 0.0);
        assert_eq!(high.support, 0);
    }

    #[test]
    fn test_empty_input() {
        let report = evaluate(&[], &[]);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.test_samples, 0);
    }
}
