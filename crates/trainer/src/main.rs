//! Patient risk model trainer
//!
//! Generates synthetic vital-sign data, fits the softmax classifier and
//! writes the model artifact consumed by risk-server. Runs offline, once;
//! any failure is fatal.

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use risk_lib::classifier::{
    fit, TrainConfig, DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITER, DEFAULT_TEST_FRACTION,
};
use risk_lib::synth::{generate, SynthConfig, DEFAULT_SAMPLES, DEFAULT_SEED};
use std::path::PathBuf;

/// Patient risk model trainer
#[derive(Parser)]
#[command(name = "risk-trainer")]
#[command(author, version, about = "Offline trainer for the patient risk model", long_about = None)]
struct Cli {
    /// Number of synthetic samples to generate
    #[arg(long, env = "TRAINER_SAMPLES", default_value_t = DEFAULT_SAMPLES)]
    samples: usize,

    /// RNG seed for sampling and the train/test split
    #[arg(long, env = "TRAINER_SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Fraction of samples held out for evaluation
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    test_fraction: f64,

    /// Upper bound on gradient-descent iterations
    #[arg(long, default_value_t = DEFAULT_MAX_ITER)]
    max_iter: usize,

    /// Gradient-descent learning rate
    #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
    learning_rate: f64,

    /// Output path for the model artifact
    #[arg(long, short, default_value = "model.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    report::print_info(&format!(
        "Generating {} synthetic samples (seed {})",
        cli.samples, cli.seed
    ));
    let data = generate(&SynthConfig {
        samples: cli.samples,
        seed: cli.seed,
    });
    report::print_class_counts(&data);

    report::print_info("Training patient risk prediction model");
    let outcome = fit(
        &data,
        &TrainConfig {
            test_fraction: cli.test_fraction,
            max_iter: cli.max_iter,
            learning_rate: cli.learning_rate,
            seed: cli.seed,
        },
    )
    .context("Model training failed")?;

    report::print_success(&format!(
        "Model training complete (held-out accuracy {:.2}%)",
        outcome.report.accuracy * 100.0
    ));
    report::print_report(&outcome.report);
    report::print_sample_predictions(&outcome.classifier);

    outcome
        .classifier
        .save(&cli.output)
        .with_context(|| format!("Failed to save model to {}", cli.output.display()))?;
    report::print_success(&format!("Model saved as '{}'", cli.output.display()));

    Ok(())
}
