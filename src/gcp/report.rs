//! Output listing and console summary for GCP matching.

use std::path::Path;

use crate::error::{Error, Result};
use crate::gcp::aggregate::AggregationResult;
use crate::gcp::table::GcpTable;

pub struct ReportWriter<'a> {
    table: &'a GcpTable,
    result: &'a AggregationResult,
}

impl<'a> ReportWriter<'a> {
    pub fn new(table: &'a GcpTable, result: &'a AggregationResult) -> Self {
        Self { table, result }
    }

    /// Header, then `<payload> <x> <y> <image>` per observation in table
    /// order.
    pub fn render_listing(&self) -> Vec<String> {
        let mut lines = vec![self.table.header().to_string()];
        for marker in &self.result.known {
            for detection in &marker.detections {
                let (x, y) = detection.pixel_center;
                lines.push(format!(
                    "{} {:?} {:?} {}",
                    marker.entry.world_coordinate, x, y, detection.image_path
                ));
            }
        }
        lines
    }

    /// Writes the listing to `path`. Nothing is created when no known marker
    /// was observed.
    pub fn write_listing(&self, path: &Path) -> Result<usize> {
        if !self.result.has_matches() {
            return Err(Error::NoMatchesFound);
        }
        let lines = self.render_listing();
        let mut out = String::new();
        for line in &lines {
            out.push_str(line);
            out.push('\n');
        }
        std::fs::write(path, out)?;
        log::info!("wrote {} observations to {}", lines.len() - 1, path.display());
        Ok(lines.len() - 1)
    }

    /// Human-readable orphan and coverage report.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let orphans = &self.result.orphans;
        if !orphans.is_empty() {
            out.push_str(&format!(
                "Found {} tags without location data.\n",
                orphans.len()
            ));
            out.push_str("Did you forget to enter their positions?\n");
            for name in orphans {
                out.push_str(&format!("\t{name}\n"));
            }
            out.push('\n');
        }
        out.push_str("Tags with positions:\n");
        for marker in &self.result.known {
            out.push_str(&format!("{}\n", marker.entry.name));
            if marker.detections.is_empty() {
                out.push_str(&format!(
                    "\tNot found in any of {} images\n",
                    self.result.images_considered
                ));
                continue;
            }
            for detection in &marker.detections {
                let (x, y) = detection.pixel_center;
                out.push_str(&format!("\t{}: ({:?}, {:?})\n", detection.image_path, x, y));
            }
        }
        out
    }
}
