//! Domain types shared by the detector adapter and both transport surfaces.

use serde::{Deserialize, Serialize};

/// Confidence threshold applied when the caller does not supply one.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.75;

/// One recognized object instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
}

/// Caller-supplied knobs for a prediction call.
///
/// The threshold is exclusive: a detection survives only if its confidence
/// is strictly greater. `max_objects: Some(0)` is a valid request and
/// yields an empty result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionOptions {
    pub confidence_threshold: f32,
    pub max_objects: Option<usize>,
}

impl Default for PredictionOptions {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_objects: None,
        }
    }
}

/// Static model descriptor, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(rename = "model_name")]
    pub name: String,
    pub version: String,
    pub device: String,
    pub categories: Vec<String>,
}

/// Liveness report for the health endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            model_loaded: true,
        }
    }
}

/// Outcome of one element of a batch request.
///
/// A tagged union rather than two optional fields: an entry structurally
/// carries either detections or an error, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Objects(Vec<String>),
    Error(String),
}

/// One entry of a batch response, serialized as `{url, objects}` or
/// `{url, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub url: String,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

impl BatchItem {
    pub fn success(url: impl Into<String>, objects: Vec<String>) -> Self {
        Self {
            url: url.into(),
            outcome: BatchOutcome::Objects(objects),
        }
    }

    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            outcome: BatchOutcome::Error(error.into()),
        }
    }
}
