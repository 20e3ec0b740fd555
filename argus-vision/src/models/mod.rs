//! Inference backends
//!
//! The model is an opaque collaborator: a CHW image tensor goes in, parallel
//! label-index and score arrays come out in the model's native order. The
//! [`InferenceBackend`] trait is the seam between the serving stack and
//! whichever runtime actually executes the network.

pub mod onnx;

use argus_core::{Error, Result};
use ndarray::ArrayD;
use std::str::FromStr;

/// Raw model output: parallel arrays in native output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDetections {
    pub labels: Vec<i64>,
    pub scores: Vec<f32>,
}

impl RawDetections {
    pub fn new(labels: Vec<i64>, scores: Vec<f32>) -> Result<Self> {
        if labels.len() != scores.len() {
            return Err(Error::Inference(format!(
                "model returned {} labels but {} scores",
                labels.len(),
                scores.len()
            )));
        }
        Ok(Self { labels, scores })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Common interface for detection model runtimes.
pub trait InferenceBackend: Send {
    /// Run the model on a `[3, H, W]` tensor scaled to [0, 1].
    fn run(&mut self, input: ArrayD<f32>) -> Result<RawDetections>;

    /// Device the model executes on ("cpu" or "cuda").
    fn device(&self) -> &str;
}

/// Inference device selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
        }
    }
}

impl FromStr for Device {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::Cuda),
            other => Err(Error::Configuration(format!(
                "unknown device '{}', expected 'cpu' or 'cuda'",
                other
            ))),
        }
    }
}

/// Backend that replays a fixed output regardless of input.
///
/// Used by the integration tests and as a smoke-test backend when no model
/// artifact is available.
#[derive(Debug, Clone)]
pub struct StaticBackend {
    output: RawDetections,
}

impl StaticBackend {
    pub fn new(output: RawDetections) -> Self {
        Self { output }
    }

    /// Convenience constructor from (label index, score) pairs.
    pub fn from_pairs(pairs: &[(i64, f32)]) -> Self {
        let labels = pairs.iter().map(|(label, _)| *label).collect();
        let scores = pairs.iter().map(|(_, score)| *score).collect();
        Self {
            output: RawDetections { labels, scores },
        }
    }
}

impl InferenceBackend for StaticBackend {
    fn run(&mut self, _input: ArrayD<f32>) -> Result<RawDetections> {
        Ok(self.output.clone())
    }

    fn device(&self) -> &str {
        "cpu"
    }
}
