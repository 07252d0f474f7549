//! Drone survey helpers.
//!
//! Two independent batch pipelines:
//!
//! 1. **Geotagging**: parse the six-line-per-frame caption track a drone writes
//!    beside its video, extract still frames with ffmpeg, and write each
//!    frame's date and GPS position into its EXIF block.
//! 2. **GCP matching**: detect AprilTag ground control points in a folder of
//!    images, join them against surveyed locations, and emit the listing
//!    photogrammetry tools consume.
//!
//! # Module Structure
//!
//! - `telemetry`: caption parsing and decimal → DMS conversion
//! - `transcode`: ffmpeg frame extraction
//! - `geotag`: EXIF writing for extracted frames
//! - `detect`: fiducial detector backends
//! - `gcp`: location table, aggregation, scanning, reporting
//! - `config`: validated run settings

pub mod config;
pub mod detect;
pub mod error;
pub mod gcp;
pub mod geotag;
pub mod telemetry;
pub mod transcode;

pub use config::{GcpConfig, StillsConfig, TranscodeOverrides, TranscodeSettings};
pub use detect::{RawDetection, StubBackend, TagDetector};
pub use error::{Error, Result};
pub use gcp::{
    marker_name, AggregationResult, Detection, DetectionAggregator, GcpEntry, GcpTable,
    ImageScanner, ReportWriter,
};
pub use geotag::{GeotagFields, GeotagWriter};
pub use telemetry::{
    CoordinateConverter, GeoCoordinate, HemisphereRef, TelemetryParser, TelemetryRecord,
};
pub use transcode::FrameExtractor;
