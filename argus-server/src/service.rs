//! Shared prediction service behind both transport adapters

use crate::metrics::Metrics;
use argus_core::{BatchItem, Detection, HealthStatus, ModelInfo, PredictionOptions, Result};
use argus_vision::{Detector, ImageFetcher};
use std::time::Instant;
use tracing::{debug, warn};

/// The one implementation of every prediction operation.
///
/// Both the HTTP and gRPC adapters call into this struct, so the two
/// surfaces cannot drift apart: filtering, ranking, batch isolation and
/// metrics recording all live here.
pub struct PredictionService {
    detector: Detector,
    fetcher: ImageFetcher,
    metrics: Metrics,
}

impl PredictionService {
    pub fn new(detector: Detector, fetcher: ImageFetcher, metrics: Metrics) -> Self {
        Self {
            detector,
            fetcher,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn model_info(&self) -> ModelInfo {
        self.detector.info().clone()
    }

    /// The service is constructed after the model finishes loading and
    /// before either listener binds, so a process that answers at all
    /// reports a loaded model.
    pub fn health(&self) -> HealthStatus {
        HealthStatus::healthy()
    }

    /// Label names at the default threshold, in the model's native order.
    pub async fn predict(&self, url: &str) -> Result<Vec<String>> {
        self.predict_with_options(url, &PredictionOptions::default())
            .await
    }

    /// Label + confidence pairs at the default threshold, ranked by
    /// descending confidence.
    pub async fn predict_with_confidence(&self, url: &str) -> Result<Vec<Detection>> {
        let started = Instant::now();
        let result = async {
            let image = self.fetcher.fetch(url).await?;
            self.detector
                .detect(&image, &PredictionOptions::default())
                .await
        }
        .await;
        self.metrics
            .record_prediction(started.elapsed(), result.is_err());
        result
    }

    /// Label names with caller-supplied threshold and cap.
    pub async fn predict_with_options(
        &self,
        url: &str,
        options: &PredictionOptions,
    ) -> Result<Vec<String>> {
        let started = Instant::now();
        let result = async {
            let image = self.fetcher.fetch(url).await?;
            self.detector.detect_labels(&image, options).await
        }
        .await;
        self.metrics
            .record_prediction(started.elapsed(), result.is_err());
        debug!(
            "predict {} finished in {:?} (ok={})",
            url,
            started.elapsed(),
            result.is_ok()
        );
        result
    }

    /// Run each URL independently. One element's failure is recorded in
    /// its own entry and never aborts the rest; the result list always has
    /// exactly one entry per requested URL, in request order.
    pub async fn batch_predict(&self, urls: &[String]) -> Vec<BatchItem> {
        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            match self.predict(url).await {
                Ok(objects) => results.push(BatchItem::success(url.clone(), objects)),
                Err(e) => {
                    warn!("batch element {} failed: {}", url, e);
                    results.push(BatchItem::failure(url.clone(), e.to_string()));
                }
            }
        }
        results
    }
}
