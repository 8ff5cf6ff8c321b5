//! Core library for patient risk prediction
//!
//! This crate provides:
//! - Vital-sign data model and physiological bounds
//! - The deterministic labeling rule for synthetic training data
//! - Seeded synthetic data generation
//! - Softmax classifier training, evaluation and artifact handling
//! - The request validation and scoring pipeline
//! - Health reporting and Prometheus metrics

pub mod classifier;
pub mod health;
pub mod models;
pub mod observability;
pub mod rule;
pub mod scorer;
pub mod synth;

pub use health::HealthReport;
pub use models::*;
pub use observability::ServiceMetrics;
pub use scorer::{RiskScorer, ScoreError};
