//! Detector adapter: raw model output to ranked, filtered detection lists

use crate::models::{InferenceBackend, RawDetections};
use crate::preprocess::{check_pixel_budget, image_to_tensor};
use argus_core::{Detection, Error, ModelInfo, PredictionOptions, Result};
use image::RgbImage;
use std::cmp::Ordering;
use tokio::sync::Mutex;
use tracing::debug;

pub const MODEL_NAME: &str = "Faster R-CNN";
pub const MODEL_VERSION: &str = "1.0";

/// Shared detector over a single model instance.
///
/// The backend sits behind an async mutex: inference calls serialize
/// through it while the rest of a request proceeds concurrently. The
/// category table and [`ModelInfo`] are fixed at construction.
pub struct Detector {
    backend: Mutex<Box<dyn InferenceBackend>>,
    categories: Vec<String>,
    info: ModelInfo,
    max_image_pixels: u64,
}

impl Detector {
    pub fn new(
        backend: Box<dyn InferenceBackend>,
        categories: Vec<String>,
        max_image_pixels: u64,
    ) -> Self {
        let info = ModelInfo {
            name: MODEL_NAME.to_string(),
            version: MODEL_VERSION.to_string(),
            device: backend.device().to_string(),
            categories: categories.clone(),
        };
        Self {
            backend: Mutex::new(backend),
            categories,
            info,
            max_image_pixels,
        }
    }

    /// Static descriptor, fixed for the process lifetime.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Detailed mode: label + confidence pairs, ranked by descending
    /// confidence.
    pub async fn detect(
        &self,
        image: &RgbImage,
        options: &PredictionOptions,
    ) -> Result<Vec<Detection>> {
        self.run(image, options, true).await
    }

    /// Simple mode: label names only, in the model's native output order
    /// unless `max_objects` limiting forces a rank.
    pub async fn detect_labels(
        &self,
        image: &RgbImage,
        options: &PredictionOptions,
    ) -> Result<Vec<String>> {
        let detections = self.run(image, options, false).await?;
        Ok(detections.into_iter().map(|d| d.label).collect())
    }

    async fn run(
        &self,
        image: &RgbImage,
        options: &PredictionOptions,
        ranked: bool,
    ) -> Result<Vec<Detection>> {
        check_pixel_budget(image, self.max_image_pixels)?;
        let tensor = image_to_tensor(image).into_dyn();

        let raw = {
            let mut backend = self.backend.lock().await;
            backend.run(tensor)?
        };
        debug!("model produced {} raw detections", raw.len());

        filter_and_rank(raw, &self.categories, options, ranked)
    }
}

/// The prediction post-processing contract.
///
/// Keeps entries whose score strictly exceeds the threshold, sorts by
/// descending confidence when the caller sees confidences (`ranked`) or
/// requested a cap, truncates to `max_objects`, and maps label indices to
/// category names. The sort is stable, so tied scores keep the model's
/// native order. A label index outside the category table fails the whole
/// call; a detection list is never partially returned.
pub fn filter_and_rank(
    raw: RawDetections,
    categories: &[String],
    options: &PredictionOptions,
    ranked: bool,
) -> Result<Vec<Detection>> {
    let mut detections = Vec::new();
    for (label, score) in raw.labels.iter().zip(raw.scores.iter()) {
        if *score > options.confidence_threshold {
            let name = usize::try_from(*label)
                .ok()
                .and_then(|index| categories.get(index))
                .ok_or_else(|| {
                    Error::Inference(format!(
                        "label index {} outside the {}-entry category table",
                        label,
                        categories.len()
                    ))
                })?;
            detections.push(Detection {
                label: name.clone(),
                confidence: *score,
            });
        }
    }

    if ranked || options.max_objects.is_some() {
        detections.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
    }

    if let Some(limit) = options.max_objects {
        detections.truncate(limit);
    }

    Ok(detections)
}
