//! Ground control point matching: known locations, detections, reporting.

mod aggregate;
mod report;
mod scan;
mod table;

pub use aggregate::{
    marker_name, AggregationResult, Detection, DetectionAggregator, MarkerObservations,
};
pub use report::ReportWriter;
pub use scan::{list_images, ImageScanner};
pub use table::{GcpEntry, GcpTable};
