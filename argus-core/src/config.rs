// Configuration for the argus serving process

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// gRPC listener configuration (plaintext, no transport encryption)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrpcConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 9090,
        }
    }
}

/// Detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Path to the exported detection model
    pub model_path: PathBuf,
    /// Optional newline-delimited category list overriding the built-in table
    pub labels_path: Option<PathBuf>,
    /// Inference device, "cpu" or "cuda"
    pub device: String,
    /// Decoded images larger than this are rejected as invalid input
    pub max_image_pixels: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/fasterrcnn.onnx"),
            labels_path: None,
            device: "cpu".to_string(),
            max_image_pixels: 100_000_000,
        }
    }
}

/// Image fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Downloads larger than this are rejected before decoding
    pub max_image_bytes: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Complete serving configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http: HttpConfig,
    pub grpc: GrpcConfig,
    pub detector: DetectorConfig,
    pub fetcher: FetcherConfig,
}

impl ServerConfig {
    /// Load configuration from a JSON or TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a string, trying JSON then TOML
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        if let Ok(config) = serde_json::from_str::<ServerConfig>(content) {
            return Ok(config);
        }

        if let Ok(config) = toml::from_str::<ServerConfig>(content) {
            return Ok(config);
        }

        Err(Error::Configuration(
            "config is neither valid JSON nor valid TOML".to_string(),
        ))
    }

    /// Build configuration from defaults overlaid with environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("ARGUS_HTTP_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                config.http.port = p;
            }
        }

        if let Ok(port) = std::env::var("ARGUS_GRPC_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                config.grpc.port = p;
            }
        }

        if let Ok(host) = std::env::var("ARGUS_BIND_ADDRESS") {
            config.http.bind_address = host.clone();
            config.grpc.bind_address = host;
        }

        if let Ok(model_path) = std::env::var("ARGUS_MODEL_PATH") {
            config.detector.model_path = PathBuf::from(model_path);
        }

        if let Ok(labels_path) = std::env::var("ARGUS_LABELS_PATH") {
            config.detector.labels_path = Some(PathBuf::from(labels_path));
        }

        if let Ok(device) = std::env::var("ARGUS_DEVICE") {
            config.detector.device = device;
        }

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.http.port == 0 {
            return Err(Error::Configuration(
                "http.port cannot be 0".to_string(),
            ));
        }

        if self.grpc.port == 0 {
            return Err(Error::Configuration(
                "grpc.port cannot be 0".to_string(),
            ));
        }

        if self.http.port == self.grpc.port {
            return Err(Error::Configuration(
                "http.port and grpc.port must differ".to_string(),
            ));
        }

        if self.detector.max_image_pixels == 0 {
            return Err(Error::Configuration(
                "detector.max_image_pixels must be > 0".to_string(),
            ));
        }

        if self.fetcher.max_image_bytes == 0 {
            return Err(Error::Configuration(
                "fetcher.max_image_bytes must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
