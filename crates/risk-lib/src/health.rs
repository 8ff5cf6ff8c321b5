//! Health reporting for the prediction service
//!
//! The health endpoint always answers 200; a missing model shows up as
//! `model_loaded: false`, not as an unhealthy status.

use crate::models::utc_timestamp;
use serde::{Deserialize, Serialize};

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub model_loaded: bool,
    pub timestamp: String,
}

impl HealthReport {
    pub fn new(model_loaded: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            model_loaded,
            timestamp: utc_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_healthy_regardless_of_model() {
        assert_eq!(HealthReport::new(true).status, "healthy");
        assert_eq!(HealthReport::new(false).status, "healthy");
    }

    #[test]
    fn test_model_loaded_flag_passes_through() {
        assert!(HealthReport::new(true).model_loaded);
        assert!(!HealthReport::new(false).model_loaded);
    }

    #[test]
    fn test_serialized_shape() {
        let report = HealthReport::new(true);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["model_loaded"], true);
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
