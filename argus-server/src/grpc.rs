//! gRPC transport adapter: the generated service trait over the shared service

use crate::service::PredictionService;
use argus_api::pb;
use argus_api::pb::instance_detector_server::{InstanceDetector, InstanceDetectorServer};
use argus_core::Error;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::error;

pub struct InstanceDetectorService {
    service: Arc<PredictionService>,
}

impl InstanceDetectorService {
    pub fn new(service: Arc<PredictionService>) -> Self {
        Self { service }
    }

    /// Wrap into the generated tonic server type, ready for
    /// `Server::builder().add_service(..)`.
    pub fn into_server(self) -> InstanceDetectorServer<Self> {
        InstanceDetectorServer::new(self)
    }
}

/// Caller-input problems become `INVALID_ARGUMENT`, everything else
/// `INTERNAL`. Mirrors the HTTP adapter's 400/500 split.
fn to_status(e: Error) -> Status {
    if e.is_invalid_input() {
        Status::invalid_argument(e.to_string())
    } else {
        error!("request failed: {}", e);
        Status::internal(e.to_string())
    }
}

#[tonic::async_trait]
impl InstanceDetector for InstanceDetectorService {
    async fn predict(
        &self,
        request: Request<pb::PredictRequest>,
    ) -> Result<Response<pb::PredictResponse>, Status> {
        let request = request.into_inner();
        let objects = self
            .service
            .predict(&request.url)
            .await
            .map_err(to_status)?;
        Ok(Response::new(pb::PredictResponse { objects }))
    }

    async fn predict_with_confidence(
        &self,
        request: Request<pb::PredictRequest>,
    ) -> Result<Response<pb::PredictWithConfidenceResponse>, Status> {
        let request = request.into_inner();
        let detections = self
            .service
            .predict_with_confidence(&request.url)
            .await
            .map_err(to_status)?;
        Ok(Response::new(pb::PredictWithConfidenceResponse {
            objects: detections.into_iter().map(Into::into).collect(),
        }))
    }

    async fn predict_with_options(
        &self,
        request: Request<pb::PredictWithOptionsRequest>,
    ) -> Result<Response<pb::PredictResponse>, Status> {
        let request = request.into_inner();
        let options = request.options();
        let objects = self
            .service
            .predict_with_options(&request.url, &options)
            .await
            .map_err(to_status)?;
        Ok(Response::new(pb::PredictResponse { objects }))
    }

    async fn batch_predict(
        &self,
        request: Request<pb::BatchPredictRequest>,
    ) -> Result<Response<pb::BatchPredictResponse>, Status> {
        let request = request.into_inner();
        let results = self
            .service
            .batch_predict(&request.urls)
            .await
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(Response::new(pb::BatchPredictResponse { results }))
    }

    async fn get_model_info(
        &self,
        _request: Request<pb::Empty>,
    ) -> Result<Response<pb::ModelInfo>, Status> {
        Ok(Response::new(self.service.model_info().into()))
    }

    async fn health_check(
        &self,
        _request: Request<pb::Empty>,
    ) -> Result<Response<pb::HealthResponse>, Status> {
        Ok(Response::new(self.service.health().into()))
    }
}
