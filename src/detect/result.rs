/// One fiducial marker reported by a detector backend.
#[derive(Clone, Debug, PartialEq)]
pub struct RawDetection {
    /// Tag family as the detector names it, e.g. `tag36h11`.
    pub family: String,
    pub tag_id: u32,
    /// Sub-pixel center, image coordinates.
    pub center: (f64, f64),
}

impl RawDetection {
    pub fn new(family: impl Into<String>, tag_id: u32, center: (f64, f64)) -> Self {
        Self {
            family: family.into(),
            tag_id,
            center,
        }
    }
}
