//! Caption telemetry: parsing and coordinate conversion.

mod coords;
mod parser;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub use coords::{CoordinateConverter, GeoCoordinate, HemisphereRef};
pub use parser::{TelemetryParser, TelemetryRecord, LINES_PER_RECORD};

/// Companion caption file for a video: same directory and stem, extension
/// replaced by `extension`.
pub fn caption_path_for(video: &Path, extension: &str) -> PathBuf {
    video.with_extension(extension)
}

/// Reads and parses a caption file.
pub fn load_records(caption_path: &Path) -> Result<Vec<TelemetryRecord>> {
    if !caption_path.is_file() {
        return Err(Error::MissingInputFile {
            what: "subtitle file",
            path: caption_path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(caption_path)?;
    let records = TelemetryParser::new().parse(&text)?;
    log::info!(
        "parsed {} telemetry records from {}",
        records.len(),
        caption_path.display()
    );
    Ok(records)
}
