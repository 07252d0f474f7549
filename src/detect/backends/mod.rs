pub mod stub;

#[cfg(feature = "detect-apriltag")]
pub mod apriltag;

pub use stub::StubBackend;

#[cfg(feature = "detect-apriltag")]
pub use self::apriltag::AprilTagBackend;
