use crate::detect::RawDetection;
use crate::gcp::table::{GcpEntry, GcpTable};

/// Character separating bit count and minimum Hamming distance in a family
/// name (`tag36h11`).
const FAMILY_SEPARATOR: char = 'h';
const TAG_ID_WIDTH: usize = 5;

/// Join key between detector output and the definitions file:
/// `tag36h11` + id 5 → `tag36_11_00005`.
pub fn marker_name(family: &str, tag_id: u32) -> String {
    format!(
        "{}_{:0width$}",
        family.replace(FAMILY_SEPARATOR, "_"),
        tag_id,
        width = TAG_ID_WIDTH
    )
}

/// A located marker in one image.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub marker_name: String,
    pub image_path: String,
    pub pixel_center: (f64, f64),
}

/// Observations of one known marker, in image processing order.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerObservations {
    pub entry: GcpEntry,
    pub detections: Vec<Detection>,
}

/// Detections bucketed by marker, plus everything that had no known location.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregationResult {
    /// Every known marker in definitions-file order, observed or not.
    pub known: Vec<MarkerObservations>,
    /// Unknown marker names, once per occurrence.
    pub orphans: Vec<String>,
    /// Number of image paths considered, including skipped ones.
    pub images_considered: usize,
}

impl AggregationResult {
    pub fn observation_count(&self) -> usize {
        self.known.iter().map(|m| m.detections.len()).sum()
    }

    pub fn has_matches(&self) -> bool {
        self.known.iter().any(|m| !m.detections.is_empty())
    }

    /// Known markers that were never detected.
    pub fn unobserved(&self) -> impl Iterator<Item = &GcpEntry> {
        self.known
            .iter()
            .filter(|m| m.detections.is_empty())
            .map(|m| &m.entry)
    }
}

/// Collects per-image detections against a [`GcpTable`].
pub struct DetectionAggregator<'a> {
    table: &'a GcpTable,
    observations: Vec<Vec<Detection>>,
    orphans: Vec<String>,
    images_considered: usize,
}

impl<'a> DetectionAggregator<'a> {
    pub fn new(table: &'a GcpTable) -> Self {
        Self {
            table,
            observations: vec![Vec::new(); table.len()],
            orphans: Vec::new(),
            images_considered: 0,
        }
    }

    /// Counts an image that was listed but could not be scanned.
    pub fn skip_image(&mut self) {
        self.images_considered += 1;
    }

    /// Adds one image's detections. Images must arrive in processing order.
    pub fn record_image(&mut self, image_path: &str, detections: &[RawDetection]) {
        self.images_considered += 1;
        for raw in detections {
            let name = marker_name(&raw.family, raw.tag_id);
            match self.table.position(&name) {
                Some(slot) => self.observations[slot].push(Detection {
                    marker_name: name,
                    image_path: image_path.to_string(),
                    pixel_center: raw.center,
                }),
                None => self.orphans.push(name),
            }
        }
    }

    pub fn finish(self) -> AggregationResult {
        let known = self
            .table
            .entries()
            .iter()
            .cloned()
            .zip(self.observations)
            .map(|(entry, detections)| MarkerObservations { entry, detections })
            .collect();
        AggregationResult {
            known,
            orphans: self.orphans,
            images_considered: self.images_considered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> GcpTable {
        GcpTable::parse("name x y z\ntag36_11_00005 1.0 2.0 3.0\ntag36_11_00007 4.0 5.0 6.0\n")
            .unwrap()
    }

    #[test]
    fn marker_name_replaces_family_separator_and_pads_id() {
        assert_eq!(marker_name("tag36h11", 5), "tag36_11_00005");
        assert_eq!(marker_name("tag25h9", 123), "tag25_9_00123");
        assert_eq!(marker_name("tag16h5", 99_999), "tag16_5_99999");
        assert_eq!(marker_name("tag36h11", 123_456), "tag36_11_123456");
    }

    #[test]
    fn separates_known_from_orphans() {
        let table = table();
        let mut agg = DetectionAggregator::new(&table);
        agg.record_image(
            "a.jpg",
            &[
                RawDetection::new("tag36h11", 5, (10.5, 20.5)),
                RawDetection::new("tag36h11", 99, (1.0, 1.0)),
            ],
        );
        agg.record_image(
            "b.jpg",
            &[
                RawDetection::new("tag36h11", 5, (11.0, 21.0)),
                RawDetection::new("tag36h11", 99, (2.0, 2.0)),
            ],
        );
        let result = agg.finish();

        assert_eq!(result.images_considered, 2);
        assert_eq!(result.orphans, ["tag36_11_00099", "tag36_11_00099"]);
        assert_eq!(result.known.len(), 2);

        let first = &result.known[0];
        assert_eq!(first.entry.name, "tag36_11_00005");
        let images: Vec<_> = first.detections.iter().map(|d| d.image_path.as_str()).collect();
        assert_eq!(images, ["a.jpg", "b.jpg"]);
        assert_eq!(first.detections[0].pixel_center, (10.5, 20.5));

        assert!(result.known[1].detections.is_empty());
        let unobserved: Vec<_> = result.unobserved().map(|e| e.name.as_str()).collect();
        assert_eq!(unobserved, ["tag36_11_00007"]);
        assert_eq!(result.observation_count(), 2);
        assert!(result.has_matches());
    }

    #[test]
    fn same_marker_twice_in_one_image_is_kept() {
        let table = table();
        let mut agg = DetectionAggregator::new(&table);
        agg.record_image(
            "a.jpg",
            &[
                RawDetection::new("tag36h11", 7, (1.0, 1.0)),
                RawDetection::new("tag36h11", 7, (5.0, 5.0)),
            ],
        );
        assert_eq!(agg.finish().known[1].detections.len(), 2);
    }

    #[test]
    fn no_detections_is_not_an_error() {
        let table = table();
        let mut agg = DetectionAggregator::new(&table);
        agg.record_image("a.jpg", &[]);
        agg.skip_image();
        let result = agg.finish();
        assert_eq!(result.images_considered, 2);
        assert!(!result.has_matches());
        assert!(result.orphans.is_empty());
        assert_eq!(result.known.len(), 2);
    }
}
