use image::GrayImage;

use crate::detect::result::RawDetection;
use crate::error::Result;

/// Fiducial detector backend.
///
/// `detect` is a blocking call with no timeout; callers scan images one at a
/// time and wait for each result.
pub trait TagDetector {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Detect every marker in an 8-bit grayscale image.
    fn detect(&mut self, image: &GrayImage) -> Result<Vec<RawDetection>>;
}
