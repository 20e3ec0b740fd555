//! argus-api: wire schema for the gRPC surface
//!
//! Holds the generated protobuf types plus the conversions between them
//! and the `argus-core` domain types, so the server's gRPC adapter stays a
//! thin mapping layer.

use argus_core::{
    BatchItem, BatchOutcome, Detection, HealthStatus, ModelInfo, PredictionOptions,
    DEFAULT_CONFIDENCE_THRESHOLD,
};

pub mod pb {
    tonic::include_proto!("inference");
}

impl From<Detection> for pb::ObjectWithConfidence {
    fn from(detection: Detection) -> Self {
        Self {
            label: detection.label,
            confidence: detection.confidence,
        }
    }
}

impl From<ModelInfo> for pb::ModelInfo {
    fn from(info: ModelInfo) -> Self {
        Self {
            model_name: info.name,
            version: info.version,
            device: info.device,
            categories: info.categories,
        }
    }
}

impl From<HealthStatus> for pb::HealthResponse {
    fn from(health: HealthStatus) -> Self {
        Self {
            status: health.status,
            model_loaded: health.model_loaded,
        }
    }
}

impl From<BatchItem> for pb::BatchPredictResult {
    fn from(item: BatchItem) -> Self {
        let outcome = match item.outcome {
            BatchOutcome::Objects(objects) => {
                pb::batch_predict_result::Outcome::Objects(pb::ObjectList { objects })
            }
            BatchOutcome::Error(error) => pb::batch_predict_result::Outcome::Error(error),
        };
        Self {
            url: item.url,
            outcome: Some(outcome),
        }
    }
}

impl pb::PredictWithOptionsRequest {
    /// Resolve the wire-level optional fields into prediction options.
    /// An unset threshold falls back to the default; an unset cap means
    /// unlimited, which is distinct from an explicit cap of 0.
    pub fn options(&self) -> PredictionOptions {
        PredictionOptions {
            confidence_threshold: self
                .confidence_threshold
                .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
            max_objects: self.max_objects.map(|n| n as usize),
        }
    }
}
