mod backend;
mod backends;
mod result;

pub use backend::TagDetector;
#[cfg(feature = "detect-apriltag")]
pub use backends::AprilTagBackend;
pub use backends::StubBackend;
pub use result::RawDetection;
