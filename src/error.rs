use std::path::PathBuf;

/// Errors returned by the geotagging and GCP matching pipelines.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("usage: {0}")]
    Usage(String),
    #[error("cannot find {what}: {}", path.display())]
    MissingInputFile { what: &'static str, path: PathBuf },
    #[error("malformed telemetry at line {line}: {reason}")]
    MalformedTelemetry { line: usize, reason: String },
    #[error("tag {0} has its location listed more than once")]
    DuplicateMarker(String),
    #[error("gcp definitions file has no header line")]
    EmptyDefinitions,
    #[error("{} isn't an image: {reason}", path.display())]
    UnreadableImage { path: PathBuf, reason: String },
    #[error("{tool} failed ({status})\nstdout: {stdout}\nstderr: {stderr}")]
    ExternalToolFailure {
        tool: String,
        status: String,
        stdout: String,
        stderr: String,
    },
    #[error("didn't find any markers that were both in the coordinates and images")]
    NoMatchesFound,
    #[error("failed to write metadata to {}: {reason}", path.display())]
    MetadataWrite { path: PathBuf, reason: String },
    #[error("detector '{backend}' failed: {reason}")]
    Detector {
        backend: &'static str,
        reason: String,
    },
    #[error("invalid config: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedTelemetry {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
