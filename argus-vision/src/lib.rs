//! argus-vision: detector adapter for the argus serving stack
//!
//! Wraps the pretrained detection model behind an [`InferenceBackend`]
//! seam, turns raw (label index, score) pairs into ranked, filtered
//! detection lists, and fetches images from caller-supplied URLs.

pub mod categories;
pub mod detector;
pub mod fetcher;
pub mod models;
pub mod preprocess;

pub use categories::{builtin_categories, load_categories, COCO_CATEGORIES};
pub use detector::{filter_and_rank, Detector};
pub use fetcher::ImageFetcher;
pub use models::{Device, InferenceBackend, RawDetections, StaticBackend};
pub use models::onnx::OnnxBackend;
