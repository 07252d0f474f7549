#![cfg(feature = "detect-apriltag")]

use ::apriltag::{Detector, DetectorBuilder, Family, Image};
use image::GrayImage;

use crate::detect::backend::TagDetector;
use crate::detect::result::RawDetection;
use crate::error::{Error, Result};

const BACKEND_NAME: &str = "apriltag";
const IMAGE_ALIGNMENT: usize = 96;
const HAMMING_BITS: usize = 1;

/// AprilTag backend over the C reference detector.
///
/// The detector is configured for a single family, so that family name is
/// attached to every detection it reports.
pub struct AprilTagBackend {
    detector: Detector,
    family: String,
}

impl AprilTagBackend {
    pub fn new(family: &str) -> Result<Self> {
        let parsed: Family = family.parse().map_err(|e| Error::Detector {
            backend: BACKEND_NAME,
            reason: format!("unknown tag family '{family}': {e:?}"),
        })?;
        let detector = DetectorBuilder::new()
            .add_family_bits(parsed, HAMMING_BITS)
            .build()
            .map_err(|e| Error::Detector {
                backend: BACKEND_NAME,
                reason: format!("failed to build detector: {e:?}"),
            })?;
        log::info!("AprilTag detector ready for family {}", family);
        Ok(Self {
            detector,
            family: family.to_string(),
        })
    }

    fn to_apriltag_image(gray: &GrayImage) -> Result<Image> {
        let (width, height) = (gray.width() as usize, gray.height() as usize);
        let mut image = Image::zeros_with_alignment(width, height, IMAGE_ALIGNMENT).ok_or(
            Error::Detector {
                backend: BACKEND_NAME,
                reason: format!("cannot allocate {width}x{height} detector image"),
            },
        )?;
        for (x, y, pixel) in gray.enumerate_pixels() {
            image[(x as usize, y as usize)] = pixel.0[0];
        }
        Ok(image)
    }
}

impl TagDetector for AprilTagBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn detect(&mut self, gray: &GrayImage) -> Result<Vec<RawDetection>> {
        let image = Self::to_apriltag_image(gray)?;
        let detections = self
            .detector
            .detect(&image)
            .into_iter()
            .map(|det| {
                let [x, y] = det.center();
                RawDetection::new(self.family.clone(), det.id() as u32, (x, y))
            })
            .collect();
        Ok(detections)
    }
}
