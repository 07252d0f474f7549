//! Caption-track telemetry parser.
//!
//! The drone writes one caption block per video frame. Each block is exactly
//! six lines:
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:02,000
//! HOME(-1.2345,6.7891) 2021.01.21 12:34:56
//! GPS(-11.2233,44.5566,20) BAROMETER:110.0
//! ISO:200 Shutter:30 EV:-1/3 Fnum:2.2
//!
//! ```
//!
//! The parser is pure: it never touches the filesystem and either returns every
//! record or fails on the first structural violation.

use crate::error::{Error, Result};

pub const LINES_PER_RECORD: usize = 6;
const MIN_LINES: usize = 5;

const OFFSET_TIME_RANGE: usize = 1;
const OFFSET_HOME_DATETIME: usize = 2;
const OFFSET_POSITION: usize = 3;
const OFFSET_CAMERA: usize = 4;

const GPS_PREFIX: &str = "GPS(";
const GPS_SUFFIX: &str = ")";

/// Geotag data decoded from one caption block.
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetryRecord {
    /// Raw caption-relative timecode (start of the range).
    pub frame_timestamp: String,
    /// EXIF canonical `YYYY:MM:DD HH:MM:SS`.
    pub capture_datetime: String,
    pub latitude_decimal: f64,
    pub longitude_decimal: f64,
    /// Barometric altitude in meters.
    pub altitude: f64,
    pub iso: String,
    pub shutter: String,
    pub exposure_value: String,
    pub f_number: String,
}

/// Parses caption text into per-frame records, in file order.
#[derive(Clone, Copy, Debug, Default)]
pub struct TelemetryParser;

impl TelemetryParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, text: &str) -> Result<Vec<TelemetryRecord>> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() < MIN_LINES {
            return Err(Error::malformed(
                lines.len(),
                format!("caption file missing data ({} lines)", lines.len()),
            ));
        }
        if lines.len() % LINES_PER_RECORD != 0 {
            return Err(Error::malformed(
                lines.len(),
                format!(
                    "missing or unexpected lines ({} is not a multiple of {})",
                    lines.len(),
                    LINES_PER_RECORD
                ),
            ));
        }

        lines
            .chunks_exact(LINES_PER_RECORD)
            .enumerate()
            .map(|(index, block)| parse_block(block, index * LINES_PER_RECORD))
            .collect()
    }
}

/// Parses one six-line block. `first_line` is the 0-based index of the
/// block's first line in the whole file; errors report 1-based line numbers.
fn parse_block(block: &[&str], first_line: usize) -> Result<TelemetryRecord> {
    let line_no = |offset: usize| first_line + offset + 1;

    let frame_timestamp = block[OFFSET_TIME_RANGE]
        .split_whitespace()
        .next()
        .ok_or_else(|| Error::malformed(line_no(OFFSET_TIME_RANGE), "empty time range line"))?
        .to_string();

    let capture_datetime = parse_datetime(block[OFFSET_HOME_DATETIME])
        .map_err(|reason| Error::malformed(line_no(OFFSET_HOME_DATETIME), reason))?;

    let position = parse_position(block[OFFSET_POSITION])
        .map_err(|reason| Error::malformed(line_no(OFFSET_POSITION), reason))?;

    let [iso, shutter, exposure_value, f_number] = parse_camera(block[OFFSET_CAMERA])
        .map_err(|reason| Error::malformed(line_no(OFFSET_CAMERA), reason))?;

    Ok(TelemetryRecord {
        frame_timestamp,
        capture_datetime,
        latitude_decimal: position.latitude,
        longitude_decimal: position.longitude,
        altitude: position.altitude,
        iso,
        shutter,
        exposure_value,
        f_number,
    })
}

fn parse_datetime(line: &str) -> std::result::Result<String, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(format!(
            "expected HOME(...) <date> <time>, found {} tokens",
            tokens.len()
        ));
    }
    Ok(tokens[1..3].join(" ").replace('.', ":"))
}

struct Position {
    longitude: f64,
    latitude: f64,
    altitude: f64,
}

fn parse_position(line: &str) -> std::result::Result<Position, String> {
    let mut tokens = line.split_whitespace();
    let gps = tokens.next().ok_or("empty position line")?;
    let barometer = tokens.next().ok_or("missing BAROMETER token")?;

    let fields = gps
        .strip_prefix(GPS_PREFIX)
        .and_then(|rest| rest.strip_suffix(GPS_SUFFIX))
        .ok_or_else(|| format!("expected GPS(...) token, found '{gps}'"))?;
    let mut fields = fields.split(',');
    // Field order is preserved as written by the caption: index 0 is treated
    // as longitude and index 1 as latitude.
    let longitude = parse_decimal(fields.next(), "GPS longitude")?;
    let latitude = parse_decimal(fields.next(), "GPS latitude")?;

    let (_, altitude) = barometer
        .split_once(':')
        .ok_or_else(|| format!("expected BAROMETER:<value>, found '{barometer}'"))?;
    let altitude = parse_decimal(Some(altitude), "barometer altitude")?;

    Ok(Position {
        longitude,
        latitude,
        altitude,
    })
}

fn parse_decimal(field: Option<&str>, what: &str) -> std::result::Result<f64, String> {
    let raw = field.map(str::trim).filter(|raw| !raw.is_empty());
    let raw = raw.ok_or_else(|| format!("missing {what}"))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("{what} '{raw}' is not a number"))?;
    if !value.is_finite() {
        return Err(format!("{what} '{raw}' is not finite"));
    }
    Ok(value)
}

fn parse_camera(line: &str) -> std::result::Result<[String; 4], String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(format!(
            "expected ISO, Shutter, EV and Fnum fields, found {} tokens",
            tokens.len()
        ));
    }
    let mut values: [String; 4] = Default::default();
    for (slot, token) in values.iter_mut().zip(&tokens) {
        let (_, value) = token
            .split_once(':')
            .ok_or_else(|| format!("camera field '{token}' has no ':'"))?;
        *slot = value.to_string();
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(index: usize, gps: &str) -> String {
        format!(
            "{index}\n\
             00:00:0{index},000 --> 00:00:0{next},000\n\
             HOME(-1.2345,6.7891) 2021.01.21 12:34:5{index}\n\
             {gps} BAROMETER:110.{index}\n\
             ISO:200 Shutter:30 EV:-1/3 Fnum:2.2\n\
             \n",
            next = index + 1
        )
    }

    #[test]
    fn parses_one_record_per_block_in_order() {
        let text: String = (1..=3)
            .map(|i| block(i, "GPS(-11.2233,44.5566,20)"))
            .collect();
        let records = TelemetryParser::new().parse(&text).unwrap();

        assert_eq!(records.len(), 3);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.frame_timestamp, format!("00:00:0{},000", i + 1));
            assert_eq!(record.capture_datetime, format!("2021:01:21 12:34:5{}", i + 1));
        }
        let first = &records[0];
        assert_eq!(first.longitude_decimal, -11.2233);
        assert_eq!(first.latitude_decimal, 44.5566);
        assert_eq!(first.altitude, 110.1);
        assert_eq!(first.iso, "200");
        assert_eq!(first.shutter, "30");
        assert_eq!(first.exposure_value, "-1/3");
        assert_eq!(first.f_number, "2.2");
    }

    #[test]
    fn barometer_overrides_gps_altitude() {
        let records = TelemetryParser::new()
            .parse(&block(1, "GPS(1.0,2.0,999)"))
            .unwrap();
        assert_eq!(records[0].altitude, 110.1);
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let text = block(1, "GPS(1.0,2.0,3)").replace('\n', "\r\n");
        let records = TelemetryParser::new().parse(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].f_number, "2.2");
    }

    #[test]
    fn rejects_line_count_not_multiple_of_six() {
        let mut text: String = (1..=5).map(|i| block(i, "GPS(1.0,2.0,3)")).collect();
        // drop the trailing blank line of the last block
        text.pop();
        assert_eq!(text.lines().count(), 29);

        let err = TelemetryParser::new().parse(&text).unwrap_err();
        assert!(matches!(err, Error::MalformedTelemetry { .. }));
    }

    #[test]
    fn rejects_short_input() {
        let err = TelemetryParser::new().parse("1\n2\n3\n").unwrap_err();
        assert!(matches!(err, Error::MalformedTelemetry { line: 3, .. }));
        assert!(TelemetryParser::new().parse("").is_err());
    }

    #[test]
    fn reports_line_of_bad_gps_token() {
        let text = format!(
            "{}{}",
            block(1, "GPS(1.0,2.0,3)"),
            block(2, "POS(1.0,2.0,3)")
        );
        let err = TelemetryParser::new().parse(&text).unwrap_err();
        match err {
            Error::MalformedTelemetry { line, reason } => {
                assert_eq!(line, 10);
                assert!(reason.contains("GPS"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_latitude() {
        let err = TelemetryParser::new()
            .parse(&block(1, "GPS(1.0)"))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedTelemetry { line: 4, .. }));
    }

    #[test]
    fn rejects_camera_field_without_colon() {
        let text = block(1, "GPS(1.0,2.0,3)").replace("ISO:200", "ISO200");
        let err = TelemetryParser::new().parse(&text).unwrap_err();
        assert!(matches!(err, Error::MalformedTelemetry { line: 5, .. }));
    }

    #[test]
    fn rejects_truncated_datetime_line() {
        let text = block(1, "GPS(1.0,2.0,3)").replace(" 12:34:51", "");
        let err = TelemetryParser::new().parse(&text).unwrap_err();
        assert!(matches!(err, Error::MalformedTelemetry { line: 3, .. }));
    }
}
