//! ONNX Runtime backend for the pretrained detection model

use super::{Device, InferenceBackend, RawDetections};
use argus_core::{Error, Result};
use ndarray::ArrayD;
use ort::execution_providers::CPUExecutionProvider;
#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;
use ort::execution_providers::ExecutionProviderDispatch;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use std::path::Path;
use tracing::{debug, info};

/// Backend running an exported Faster R-CNN graph through ONNX Runtime.
///
/// The graph takes one `[3, H, W]` f32 tensor in [0, 1] and produces
/// boxes, labels and scores tensors, already in descending score order.
pub struct OnnxBackend {
    session: Session,
    device: Device,
}

impl OnnxBackend {
    /// Load the model from disk and prepare a session on the given device.
    pub fn load(model_path: &Path, device: Device) -> Result<Self> {
        let session = SessionBuilder::new()
            .map_err(|e| Error::ModelLoad(format!("failed to create session builder: {}", e)))?
            .with_execution_providers(providers(device)?)
            .map_err(|e| Error::ModelLoad(format!("failed to register {}: {}", device.as_str(), e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::ModelLoad(format!("failed to set optimization level: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| {
                Error::ModelLoad(format!(
                    "failed to load model from {}: {}",
                    model_path.display(),
                    e
                ))
            })?;

        info!(
            "detection model loaded from {} on {}",
            model_path.display(),
            device.as_str()
        );

        Ok(Self { session, device })
    }
}

fn providers(device: Device) -> Result<Vec<ExecutionProviderDispatch>> {
    match device {
        Device::Cpu => Ok(vec![CPUExecutionProvider::default().build()]),
        #[cfg(feature = "cuda")]
        Device::Cuda => Ok(vec![CUDAExecutionProvider::default()
            .build()
            .error_on_failure()]),
        #[cfg(not(feature = "cuda"))]
        Device::Cuda => Err(Error::Configuration(
            "cuda device requested but argus-vision was built without the 'cuda' feature"
                .to_string(),
        )),
    }
}

impl InferenceBackend for OnnxBackend {
    fn run(&mut self, input: ArrayD<f32>) -> Result<RawDetections> {
        debug!("running inference on {:?} tensor", input.shape());

        let inputs = ort::inputs![input.view()]
            .map_err(|e| Error::Inference(format!("failed to bind model input: {}", e)))?;

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| Error::Inference(format!("model execution failed: {}", e)))?;

        // Output order follows the exported graph: boxes, labels, scores.
        let values: Vec<_> = outputs.iter().map(|(_, value)| value).collect();
        if values.len() < 3 {
            return Err(Error::Inference(format!(
                "expected boxes/labels/scores outputs, got {} tensors",
                values.len()
            )));
        }

        let labels = values[1]
            .try_extract_tensor::<i64>()
            .map_err(|e| Error::Inference(format!("failed to read label tensor: {}", e)))?
            .iter()
            .copied()
            .collect::<Vec<i64>>();

        let scores = values[2]
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference(format!("failed to read score tensor: {}", e)))?
            .iter()
            .copied()
            .collect::<Vec<f32>>();

        RawDetections::new(labels, scores)
    }

    fn device(&self) -> &str {
        self.device.as_str()
    }
}
