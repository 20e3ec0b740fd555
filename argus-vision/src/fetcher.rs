//! Single-shot image retrieval from caller-supplied URLs

use argus_core::config::FetcherConfig;
use argus_core::{Error, Result};
use image::RgbImage;
use tracing::debug;

/// Fetches an image over HTTP and normalizes it to 3-channel RGB.
///
/// Best-effort and single-shot: no retries, no caching, no rate limiting.
/// Every failure on this path is the caller's input problem.
pub struct ImageFetcher {
    client: reqwest::Client,
    max_image_bytes: usize,
}

impl ImageFetcher {
    pub fn new(config: &FetcherConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            max_image_bytes: config.max_image_bytes,
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<RgbImage> {
        debug!("fetching image from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("failed to download {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{} returned HTTP {}", url, status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(format!("failed to read body of {}: {}", url, e)))?;

        if bytes.is_empty() {
            return Err(Error::Fetch(format!("{} returned an empty body", url)));
        }
        if bytes.len() > self.max_image_bytes {
            return Err(Error::InvalidInput(format!(
                "{} returned {} bytes, exceeding the {} byte limit",
                url,
                bytes.len(),
                self.max_image_bytes
            )));
        }

        let image = image::load_from_memory(&bytes)
            .map_err(|e| Error::Decode(format!("{} is not a decodable image: {}", url, e)))?;

        Ok(image.to_rgb8())
    }
}
