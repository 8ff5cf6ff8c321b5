//! Training report formatting

use colored::Colorize;
use risk_lib::classifier::{EvalReport, SoftmaxClassifier};
use risk_lib::models::{RiskLabel, VitalSigns};
use risk_lib::synth::LabeledSet;
use tabled::{settings::Style, Table, Tabled};

/// One row of the classification report table
#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Precision")]
    precision: String,
    #[tabled(rename = "Recall")]
    recall: String,
    #[tabled(rename = "F1")]
    f1: String,
    #[tabled(rename = "Support")]
    support: usize,
}

/// Print the held-out classification report
pub fn print_report(report: &EvalReport) {
    let rows: Vec<ReportRow> = report
        .classes
        .iter()
        .map(|c| ReportRow {
            class: format!("{} Risk", c.label),
            precision: format!("{:.2}", c.precision),
            recall: format!("{:.2}", c.recall),
            f1: format!("{:.2}", c.f1),
            support: c.support,
        })
        .collect();

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{}", table);
    println!(
        "Accuracy: {:.2}% on {} held-out samples",
        report.accuracy * 100.0,
        report.test_samples
    );
}

/// Print the label distribution of the generated dataset
pub fn print_class_counts(data: &LabeledSet) {
    let counts = data.class_counts();
    let parts: Vec<String> = RiskLabel::ALL
        .iter()
        .zip(counts)
        .map(|(label, count)| format!("{}: {}", label, count))
        .collect();
    print_info(&format!("Label distribution - {}", parts.join(", ")));
}

/// Score three reference patients with the freshly fitted model
pub fn print_sample_predictions(classifier: &SoftmaxClassifier) {
    let samples = [
        VitalSigns::new(75.0, 120.0, 98.6, 98.0),
        VitalSigns::new(110.0, 150.0, 100.5, 92.0),
        VitalSigns::new(130.0, 170.0, 103.0, 88.0),
    ];

    println!("Sample predictions:");
    for (i, vitals) in samples.iter().enumerate() {
        let result = classifier.score(vitals);
        println!(
            "Patient {}: [{}, {}, {}, {}] -> {} Risk (confidence: {})",
            i + 1,
            vitals.heart_rate,
            vitals.blood_pressure,
            vitals.temperature,
            vitals.oxygen_level,
            result.risk_level,
            format_confidence(result.confidence)
        );
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format confidence as percentage
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(0.954), "95%");
        assert_eq!(format_confidence(1.0), "100%");
        assert_eq!(format_confidence(0.0), "0%");
    }
}
