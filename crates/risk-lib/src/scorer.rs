//! Request validation and scoring pipeline
//!
//! Three linear stages: load (once, at startup), validate (per request),
//! predict (per request). All errors are request-local; none crash the
//! process.

use crate::classifier::SoftmaxClassifier;
use crate::models::{ScoredResult, VitalSigns, NUM_FEATURES, REQUIRED_FIELDS, VITAL_BOUNDS};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Request-boundary errors, each mapped to exactly one HTTP status
#[derive(Debug, Error)]
pub enum ScoreError {
    /// One or more of the four required fields is absent (400)
    #[error("Missing required fields: [{}]", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A field value could not be coerced to a number (400)
    #[error("Invalid input values: {0}")]
    InvalidValue(String),

    /// A field value lies outside its physiological bound (400)
    #[error("Invalid {field} (must be {min}-{max}{unit})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        unit: &'static str,
    },

    /// The model artifact failed to load at startup (500)
    #[error("Model not loaded")]
    ModelUnavailable,

    /// Unexpected failure during inference (500)
    #[error("Prediction failed: {0}")]
    Prediction(String),
}

impl ScoreError {
    /// True for faults in the request itself (HTTP 400); false for server
    /// faults (HTTP 500)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ScoreError::MissingFields(_) | ScoreError::InvalidValue(_) | ScoreError::OutOfRange { .. }
        )
    }
}

/// Parse and validate a JSON request body into vitals
///
/// Stage order: presence of all four fields, numeric coercion, then
/// per-field bound checks in declaration order (first violation reported).
/// NaN and infinities fail the bound check.
pub fn validate_request(body: &Value) -> Result<VitalSigns, ScoreError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ScoreError::InvalidValue("request body must be a JSON object".into()))?;

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !obj.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ScoreError::MissingFields(missing));
    }

    let mut values = [0.0; NUM_FEATURES];
    for (value, field) in values.iter_mut().zip(REQUIRED_FIELDS) {
        *value = coerce_number(field, &obj[field])?;
    }

    for (value, bound) in values.iter().zip(VITAL_BOUNDS) {
        if !bound.contains(*value) {
            return Err(ScoreError::OutOfRange {
                field: bound.field,
                min: bound.min,
                max: bound.max,
                unit: bound.unit,
            });
        }
    }

    Ok(VitalSigns::new(values[0], values[1], values[2], values[3]))
}

/// Coerce a JSON value to `f64`; numeric strings are accepted
fn coerce_number(field: &str, value: &Value) -> Result<f64, ScoreError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ScoreError::InvalidValue(format!("could not convert {field} to float"))),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            ScoreError::InvalidValue(format!("could not convert string to float: '{s}'"))
        }),
        other => Err(ScoreError::InvalidValue(format!(
            "could not convert {field} of type {} to float",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Stateless scoring engine holding the optional loaded model
///
/// Shared read-only across all concurrent requests; `score` takes `&self`
/// and performs pure arithmetic.
pub struct RiskScorer {
    model: Option<SoftmaxClassifier>,
}

impl RiskScorer {
    /// Load the model artifact, degrading instead of failing
    ///
    /// On any load error the scorer starts without a model and every
    /// prediction reports `ModelUnavailable`; the health probe stays up.
    pub fn load(path: &Path) -> Self {
        match SoftmaxClassifier::load(path) {
            Ok(model) => {
                info!(path = %path.display(), "Model loaded");
                Self { model: Some(model) }
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{error:#}"),
                    "Model unavailable, serving degraded"
                );
                Self { model: None }
            }
        }
    }

    pub fn with_model(model: SoftmaxClassifier) -> Self {
        Self { model: Some(model) }
    }

    pub fn without_model() -> Self {
        Self { model: None }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Full validate-then-predict pipeline for one request body
    ///
    /// Returns the validated vitals alongside the scored result so the API
    /// layer can echo the parsed input.
    pub fn score(&self, body: &Value) -> Result<(VitalSigns, ScoredResult), ScoreError> {
        let vitals = validate_request(body)?;
        let result = self.predict(&vitals)?;
        Ok((vitals, result))
    }

    /// Score already-validated vitals
    pub fn predict(&self, vitals: &VitalSigns) -> Result<ScoredResult, ScoreError> {
        let model = self.model.as_ref().ok_or(ScoreError::ModelUnavailable)?;
        let result = model.score(vitals);
        // The artifact is external input; a malformed one could yield
        // non-finite logits without tripping the checksum
        if !result.confidence.is_finite() {
            return Err(ScoreError::Prediction(
                "classifier produced a non-finite probability".into(),
            ));
        }
        Ok(result)
    }
}
