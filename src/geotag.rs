//! Writes telemetry records into the EXIF block of extracted frames.
//!
//! Record *i* is paired with the *i*-th frame in filename order. Writes happen
//! in place, one file at a time; an interrupted run leaves a tagged prefix and
//! can simply be re-run.

use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::telemetry::{CoordinateConverter, GeoCoordinate, TelemetryRecord};

const SECONDS_DENOMINATOR: u32 = 1000;
const ALTITUDE_DENOMINATOR: u32 = 100;
const ALTITUDE_ABOVE_SEA_LEVEL: u8 = 0;

/// EXIF-ready geotag derived from one telemetry record.
#[derive(Clone, Debug, PartialEq)]
pub struct GeotagFields {
    pub datetime: String,
    pub latitude: GeoCoordinate,
    pub longitude: GeoCoordinate,
    /// Meters; negative readings are clamped to zero.
    pub altitude: f64,
    pub altitude_ref: u8,
}

impl GeotagFields {
    pub fn from_record(record: &TelemetryRecord) -> Self {
        if record.altitude < 0.0 {
            log::warn!(
                "{}: barometer reads {} m below sea level; recording 0 m",
                record.frame_timestamp,
                -record.altitude
            );
        }
        Self {
            datetime: record.capture_datetime.clone(),
            latitude: CoordinateConverter::latitude(record.latitude_decimal),
            longitude: CoordinateConverter::longitude(record.longitude_decimal),
            altitude: record.altitude.max(0.0),
            altitude_ref: ALTITUDE_ABOVE_SEA_LEVEL,
        }
    }

    fn tags(&self) -> Vec<ExifTag> {
        vec![
            ExifTag::ModifyDate(self.datetime.clone()),
            ExifTag::DateTimeOriginal(self.datetime.clone()),
            ExifTag::GPSLatitudeRef(self.latitude.hemisphere.as_str().to_string()),
            ExifTag::GPSLatitude(dms_rationals(&self.latitude)),
            ExifTag::GPSLongitudeRef(self.longitude.hemisphere.as_str().to_string()),
            ExifTag::GPSLongitude(dms_rationals(&self.longitude)),
            ExifTag::GPSAltitudeRef(vec![self.altitude_ref]),
            ExifTag::GPSAltitude(vec![rational(self.altitude, ALTITUDE_DENOMINATOR)]),
        ]
    }
}

/// Degrees, minutes and seconds as EXIF rationals. Seconds that round up to
/// a full minute carry into the minutes (and on into the degrees).
fn dms_rationals(coord: &GeoCoordinate) -> Vec<uR64> {
    let mut degrees = coord.degrees;
    let mut minutes = coord.minutes;
    let mut seconds = rational(coord.seconds, SECONDS_DENOMINATOR);
    if seconds.nominator >= 60 * SECONDS_DENOMINATOR {
        seconds.nominator -= 60 * SECONDS_DENOMINATOR;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes -= 60;
        degrees += 1;
    }
    vec![
        uR64 {
            nominator: degrees,
            denominator: 1,
        },
        uR64 {
            nominator: minutes,
            denominator: 1,
        },
        seconds,
    ]
}

fn rational(value: f64, denominator: u32) -> uR64 {
    uR64 {
        nominator: (value * denominator as f64).round() as u32,
        denominator,
    }
}

/// Extracted frames in extraction order: regular `.jpg`/`.jpeg` files sorted
/// by filename.
pub fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_jpeg = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg")
            });
        if is_jpeg && path.is_file() {
            frames.push(path);
        }
    }
    frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(frames)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GeotagWriter;

impl GeotagWriter {
    pub fn new() -> Self {
        Self
    }

    /// Tags `frames[i]` with `records[i]` and returns how many frames were
    /// written. A count mismatch is logged and only the common prefix is
    /// tagged.
    pub fn apply(&self, frames: &[PathBuf], records: &[TelemetryRecord]) -> Result<usize> {
        self.apply_with(frames, records, |_| {})
    }

    /// Like [`GeotagWriter::apply`], calling `on_frame` after each frame is
    /// written.
    pub fn apply_with(
        &self,
        frames: &[PathBuf],
        records: &[TelemetryRecord],
        mut on_frame: impl FnMut(&Path),
    ) -> Result<usize> {
        if frames.len() != records.len() {
            log::warn!(
                "transcoder produced {} frames for {} telemetry records; tags may be misaligned",
                frames.len(),
                records.len()
            );
        }
        let mut written = 0;
        for (frame, record) in frames.iter().zip(records) {
            let fields = GeotagFields::from_record(record);
            self.write(frame, &fields)?;
            log::debug!(
                "{}: {} lat={} lon={} alt={}",
                frame.display(),
                fields.datetime,
                fields.latitude,
                fields.longitude,
                fields.altitude
            );
            on_frame(frame);
            written += 1;
        }
        Ok(written)
    }

    /// Writes one geotag into `path`, keeping any existing EXIF tags.
    pub fn write(&self, path: &Path, fields: &GeotagFields) -> Result<()> {
        let mut metadata = match Metadata::new_from_path(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::debug!("no readable EXIF in {} ({}); starting fresh", path.display(), e);
                Metadata::new()
            }
        };
        for tag in fields.tags() {
            metadata.set_tag(tag);
        }
        metadata
            .write_to_file(path)
            .map_err(|e| Error::MetadataWrite {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}
