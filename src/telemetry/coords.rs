//! Decimal degrees to degree/minute/second conversion.

use std::fmt;

/// EXIF GPS hemisphere reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HemisphereRef {
    N,
    S,
    E,
    W,
}

impl HemisphereRef {
    pub fn as_str(self) -> &'static str {
        match self {
            HemisphereRef::N => "N",
            HemisphereRef::S => "S",
            HemisphereRef::E => "E",
            HemisphereRef::W => "W",
        }
    }

    fn is_negative(self) -> bool {
        matches!(self, HemisphereRef::S | HemisphereRef::W)
    }
}

impl fmt::Display for HemisphereRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unsigned sexagesimal angle plus the hemisphere that carries its sign.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoCoordinate {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
    pub hemisphere: HemisphereRef,
}

impl GeoCoordinate {
    /// Signed decimal degrees described by this coordinate.
    pub fn to_decimal(&self) -> f64 {
        let magnitude =
            self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0;
        if self.hemisphere.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}°{}'{:.4}\"{}",
            self.degrees, self.minutes, self.seconds, self.hemisphere
        )
    }
}

/// Converts decimal degrees into [`GeoCoordinate`]s.
///
/// Input must be finite. A negative value (including `-0.0`) takes the
/// negative reference; the sign is then dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoordinateConverter;

impl CoordinateConverter {
    pub fn convert(
        value: f64,
        positive_ref: HemisphereRef,
        negative_ref: HemisphereRef,
    ) -> GeoCoordinate {
        let hemisphere = if value.is_sign_negative() {
            negative_ref
        } else {
            positive_ref
        };
        let magnitude = value.abs();
        let degrees = magnitude.floor();
        let minutes_float = 60.0 * (magnitude - degrees);
        let minutes = minutes_float.floor();
        let seconds = 60.0 * (minutes_float - minutes);

        GeoCoordinate {
            degrees: degrees as u32,
            minutes: minutes as u32,
            seconds,
            hemisphere,
        }
    }

    pub fn latitude(value: f64) -> GeoCoordinate {
        Self::convert(value, HemisphereRef::N, HemisphereRef::S)
    }

    pub fn longitude(value: f64) -> GeoCoordinate {
        Self::convert(value, HemisphereRef::E, HemisphereRef::W)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn negative_latitude_goes_south() {
        let c = CoordinateConverter::convert(-11.2233, HemisphereRef::N, HemisphereRef::S);
        assert_eq!(c.hemisphere, HemisphereRef::S);
        assert_eq!(c.degrees, 11);
        assert_eq!(c.minutes, 13);
        assert!((c.seconds - 23.88).abs() < 1e-6, "seconds = {}", c.seconds);
    }

    #[test]
    fn positive_longitude_goes_east() {
        let c = CoordinateConverter::longitude(44.5566);
        assert_eq!(c.hemisphere, HemisphereRef::E);
        assert_eq!(c.degrees, 44);
        assert_eq!(c.minutes, 33);
        assert!((c.seconds - 23.76).abs() < 1e-6, "seconds = {}", c.seconds);
    }

    #[test]
    fn negative_zero_takes_negative_ref() {
        let c = CoordinateConverter::longitude(-0.0);
        assert_eq!(c.hemisphere, HemisphereRef::W);
        assert_eq!((c.degrees, c.minutes), (0, 0));
        assert_eq!(c.seconds, 0.0);
    }

    #[test]
    fn round_trips_through_decimal() {
        for value in [0.0, 1.5, -1.5, 89.999_999, -179.123_456, 45.000_001, -0.000_3] {
            let lat = CoordinateConverter::latitude(value);
            let magnitude =
                lat.degrees as f64 + lat.minutes as f64 / 60.0 + lat.seconds / 3600.0;
            assert!((magnitude - value.abs()).abs() < EPS, "{value}");
            assert!((lat.to_decimal() - value).abs() < EPS, "{value}");
            assert!(lat.minutes < 60);
            assert!(lat.seconds >= 0.0 && lat.seconds < 60.0);
        }
    }

    #[test]
    fn displays_as_dms() {
        let c = CoordinateConverter::latitude(-11.2233);
        assert_eq!(c.to_string(), "11°13'23.8800\"S");
    }
}
