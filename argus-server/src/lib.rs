pub mod grpc;
pub mod http;
pub mod metrics;
pub mod service;

pub use grpc::InstanceDetectorService;
pub use http::{create_router, ApiState};
pub use metrics::Metrics;
pub use service::PredictionService;
