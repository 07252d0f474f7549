//! Sequential image scanning.
//!
//! Every regular file in the folder is a candidate; files that don't decode as
//! images are reported and skipped, as are images the detector fails on.

use std::path::{Path, PathBuf};

use crate::detect::TagDetector;
use crate::error::{Error, Result};
use crate::gcp::aggregate::{AggregationResult, DetectionAggregator};
use crate::gcp::table::GcpTable;

/// Regular files in `dir`, sorted by path.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn load_gray(path: &Path) -> Result<image::GrayImage> {
    let decoded = image::open(path).map_err(|e| Error::UnreadableImage {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(decoded.to_luma8())
}

pub struct ImageScanner<'d> {
    detector: &'d mut dyn TagDetector,
}

impl<'d> ImageScanner<'d> {
    pub fn new(detector: &'d mut dyn TagDetector) -> Self {
        Self { detector }
    }

    /// Scans `paths` in the given order and aggregates against `table`.
    pub fn scan(&mut self, paths: &[PathBuf], table: &GcpTable) -> AggregationResult {
        self.scan_with(paths, table, |_| {})
    }

    /// Like [`ImageScanner::scan`], calling `on_image` once per path whether
    /// or not the image could be scanned.
    pub fn scan_with(
        &mut self,
        paths: &[PathBuf],
        table: &GcpTable,
        mut on_image: impl FnMut(&Path),
    ) -> AggregationResult {
        let mut aggregator = DetectionAggregator::new(table);
        for path in paths {
            on_image(path);
            log::info!("searching for tags in {}", path.display());
            let image = match load_gray(path) {
                Ok(image) => image,
                Err(e) => {
                    log::info!("{}", e);
                    aggregator.skip_image();
                    continue;
                }
            };
            let detections = match self.detector.detect(&image) {
                Ok(detections) => detections,
                Err(e) => {
                    log::warn!("skipping {}: {}", path.display(), e);
                    aggregator.skip_image();
                    continue;
                }
            };
            match detections.len() {
                0 => log::info!("\tfound no tags"),
                1 => log::info!("\tfound 1 tag"),
                n => log::info!("\tfound {} tags", n),
            }
            aggregator.record_image(&path.display().to_string(), &detections);
        }
        aggregator.finish()
    }
}
