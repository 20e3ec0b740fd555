//! Image preprocessing for the detection model

use argus_core::{Error, Result};
use image::RgbImage;
use ndarray::Array3;

/// Reject images whose pixel count exceeds the configured budget before any
/// tensor allocation happens.
pub fn check_pixel_budget(image: &RgbImage, max_pixels: u64) -> Result<()> {
    let (width, height) = image.dimensions();
    let pixels = u64::from(width) * u64::from(height);
    if pixels == 0 {
        return Err(Error::InvalidInput("image has zero pixels".to_string()));
    }
    if pixels > max_pixels {
        return Err(Error::InvalidInput(format!(
            "image has {} pixels, exceeding the {} pixel budget",
            pixels, max_pixels
        )));
    }
    Ok(())
}

/// Convert an RGB image into the CHW f32 tensor the model consumes,
/// with channel values scaled to [0, 1].
pub fn image_to_tensor(image: &RgbImage) -> Array3<f32> {
    let (width, height) = image.dimensions();
    let mut tensor = Array3::<f32>::zeros((3, height as usize, width as usize));

    for (x, y, pixel) in image.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        tensor[[0, y, x]] = pixel[0] as f32 / 255.0;
        tensor[[1, y, x]] = pixel[1] as f32 / 255.0;
        tensor[[2, y, x]] = pixel[2] as f32 / 255.0;
    }

    tensor
}
