//! Three-dimensional points with additional attributes.

mod format;
mod scan_direction;

pub use self::format::Format;
pub use self::scan_direction::ScanDirection;

use crate::{Color, Result, Transform, Vector, raw};
use chrono::{DateTime, Utc};
use thiserror::Error;

const CLASS_CODE_MASK: u8 = 0b0001_1111;
const SYNTHETIC_MASK: u8 = 0b0010_0000;
const KEY_POINT_MASK: u8 = 0b0100_0000;
const WITHHELD_MASK: u8 = 0b1000_0000;
const MAX_RETURN_NUMBER: u8 = 7;
const MAX_MICROSECONDS: u32 = 999_999;

/// Point-specific errors.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The return number does not fit in three bits.
    #[error("return number {0} does not fit in three bits")]
    ReturnNumber(u8),

    /// The number of returns does not fit in three bits.
    #[error("number of returns {0} does not fit in three bits")]
    NumberOfReturns(u8),

    /// The scan angle rank is outside of -90 to 90.
    #[error("scan angle rank {0} is outside of -90 to 90")]
    ScanAngleRank(i8),
}

/// A point is the basic unit of information in las data.
///
/// Coordinates are real world values. They are scaled into the stored integers by the file's
/// transforms when the point is written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Point {
    /// The x coordinate, as a float.
    pub x: f64,
    /// The y coordinate, as a float.
    pub y: f64,
    /// The z coordinate, as a float.
    pub z: f64,

    /// The integer representation of the pulse return magnitude.
    ///
    /// Zero could be a valid intensity, so this isn't an `Option`.
    pub intensity: u16,

    /// The pulse return number for a given output pulse.
    pub return_number: u8,

    /// The total number of returns for a given pulse.
    pub number_of_returns: u8,

    /// The direction at which the scanner mirror was traveling at the time of the output pulse.
    pub scan_direction: ScanDirection,

    /// True if the point is at the end of a scan.
    pub is_edge_of_flight_line: bool,

    /// The full classification byte.
    ///
    /// See `class_code`, `is_synthetic`, `is_key_point` and `is_withheld` for its parts.
    pub classification: u8,

    /// The angle, rounded to the nearest integer, of the output of the laser pulse.
    ///
    /// Zero degrees is nadir, -90° is to the left.
    pub scan_angle_rank: i8,

    /// Used at the user's discretion.
    pub user_data: u8,

    /// The file from which this point originated.
    pub point_source_id: u16,

    /// The time at which the point was acquired, in seconds.
    pub gps_time: Option<f64>,

    /// This point's color.
    pub color: Option<Color>,

    /// Opaque bytes that follow the point's defined fields in its record.
    pub extra_bytes: Vec<u8>,
}

impl Point {
    /// Creates a point from a raw point and the transforms of its file.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::{Point, Transform, Vector, raw};
    /// let raw_point = raw::Point { x: 4200, ..Default::default() };
    /// let point = Point::new(raw_point, &Vector::splat(Transform::default()));
    /// assert_eq!(42., point.x);
    /// ```
    pub fn new(raw_point: raw::Point, transforms: &Vector<Transform>) -> Point {
        Point {
            x: transforms.x.to_real(raw_point.x),
            y: transforms.y.to_real(raw_point.y),
            z: transforms.z.to_real(raw_point.z),
            intensity: raw_point.intensity,
            return_number: raw_point.return_number(),
            number_of_returns: raw_point.number_of_returns(),
            scan_direction: raw_point.scan_direction_flag().into(),
            is_edge_of_flight_line: raw_point.edge_of_flight_line(),
            classification: raw_point.classification,
            scan_angle_rank: raw_point.scan_angle_rank,
            user_data: raw_point.user_data,
            point_source_id: raw_point.point_source_id,
            gps_time: raw_point.gps_time,
            color: raw_point.color,
            extra_bytes: raw_point.extra_bytes,
        }
    }

    /// Converts this point into a raw point, scaling its coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::{Point, Transform, Vector};
    /// let point = Point { x: 42., return_number: 2, ..Default::default() };
    /// let raw_point = point.into_raw(&Vector::splat(Transform::default())).unwrap();
    /// assert_eq!(4200, raw_point.x);
    /// assert_eq!(2, raw_point.return_number());
    ///
    /// let point = Point { return_number: 8, ..Default::default() };
    /// assert!(point.into_raw(&Vector::splat(Transform::default())).is_err());
    /// ```
    pub fn into_raw(self, transforms: &Vector<Transform>) -> Result<raw::Point> {
        if self.return_number > MAX_RETURN_NUMBER {
            return Err(Error::ReturnNumber(self.return_number).into());
        }
        if self.number_of_returns > MAX_RETURN_NUMBER {
            return Err(Error::NumberOfReturns(self.number_of_returns).into());
        }
        let mut raw_point = raw::Point {
            x: transforms.x.to_raw(self.x)?,
            y: transforms.y.to_raw(self.y)?,
            z: transforms.z.to_raw(self.z)?,
            intensity: self.intensity,
            flags: 0,
            classification: self.classification,
            scan_angle_rank: self.scan_angle_rank,
            user_data: self.user_data,
            point_source_id: self.point_source_id,
            gps_time: self.gps_time,
            color: self.color,
            extra_bytes: self.extra_bytes,
        };
        raw_point.set_return_number(self.return_number);
        raw_point.set_number_of_returns(self.number_of_returns);
        raw_point.set_scan_direction_flag(self.scan_direction.is_set());
        raw_point.set_edge_of_flight_line(self.is_edge_of_flight_line);
        Ok(raw_point)
    }

    /// Returns true if this point can be written with this format without losing data.
    ///
    /// Missing gps time or color is fine, since those are written as zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Point;
    /// use lasfile::point::Format;
    /// let point = Point { gps_time: Some(1.), ..Default::default() };
    /// assert!(!point.matches(&Format::new(0).unwrap()));
    /// assert!(point.matches(&Format::new(1).unwrap()));
    /// ```
    pub fn matches(&self, format: &Format) -> bool {
        (format.has_gps_time || self.gps_time.is_none())
            && (format.has_color || self.color.is_none())
            && (self.extra_bytes.is_empty()
                || self.extra_bytes.len() == usize::from(format.extra_bytes))
    }

    /// Checks that this point's attributes are in their valid ranges.
    ///
    /// The file format itself only limits the return fields, but scan angle ranks outside of -90
    /// to 90 make no physical sense.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Point;
    /// assert!(Point::default().validate().is_ok());
    /// assert!(Point { scan_angle_rank: 91, ..Default::default() }.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.return_number > MAX_RETURN_NUMBER {
            return Err(Error::ReturnNumber(self.return_number).into());
        }
        if self.number_of_returns > MAX_RETURN_NUMBER {
            return Err(Error::NumberOfReturns(self.number_of_returns).into());
        }
        if !(-90..=90).contains(&self.scan_angle_rank) {
            return Err(Error::ScanAngleRank(self.scan_angle_rank).into());
        }
        Ok(())
    }

    /// Returns the gps time as a UTC timestamp, rounded to the microsecond.
    ///
    /// Fractions that would round up to a full second are clamped to 999999 microseconds.
    /// Returns `None` if there is no gps time or it is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Point;
    /// use chrono::Timelike;
    /// let point = Point { gps_time: Some(1.9999999), ..Default::default() };
    /// let time = point.time().unwrap();
    /// assert_eq!(1, time.timestamp());
    /// assert_eq!(999_999, time.nanosecond() / 1000);
    /// ```
    pub fn time(&self) -> Option<DateTime<Utc>> {
        let gps_time = self.gps_time?;
        if !gps_time.is_finite() {
            return None;
        }
        let seconds = gps_time.floor();
        if seconds < i64::MIN as f64 || seconds > i64::MAX as f64 {
            return None;
        }
        let microseconds = (((gps_time - seconds) * 1e6).round() as u32).min(MAX_MICROSECONDS);
        DateTime::from_timestamp(seconds as i64, microseconds * 1000)
    }

    /// Sets the gps time from a UTC timestamp, keeping microsecond precision.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Point;
    /// use chrono::DateTime;
    /// let mut point = Point::default();
    /// point.set_time(DateTime::from_timestamp(1_205_884_800, 500_000_000).unwrap());
    /// assert_eq!(Some(1_205_884_800.5), point.gps_time);
    /// ```
    pub fn set_time(&mut self, time: DateTime<Utc>) {
        let microseconds = time.timestamp_subsec_micros();
        self.gps_time = Some(time.timestamp() as f64 + f64::from(microseconds) * 1e-6);
    }

    /// Sets this point's color.
    pub fn set_color(&mut self, color: impl Into<Color>) {
        self.color = Some(color.into());
    }

    /// Returns the ASPRS class, the low five bits of the classification byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Point;
    /// let point = Point { classification: 0b1010_0010, ..Default::default() };
    /// assert_eq!(2, point.class_code());
    /// assert!(point.is_synthetic());
    /// assert!(!point.is_key_point());
    /// assert!(point.is_withheld());
    /// ```
    pub fn class_code(&self) -> u8 {
        self.classification & CLASS_CODE_MASK
    }

    /// Was this point created by a technique other than LiDAR collection?
    pub fn is_synthetic(&self) -> bool {
        self.classification & SYNTHETIC_MASK == SYNTHETIC_MASK
    }

    /// Should this point be considered a model key-point?
    pub fn is_key_point(&self) -> bool {
        self.classification & KEY_POINT_MASK == KEY_POINT_MASK
    }

    /// Should this point be considered withheld, i.e. deleted?
    pub fn is_withheld(&self) -> bool {
        self.classification & WITHHELD_MASK == WITHHELD_MASK
    }

    /// Sets the ASPRS class, leaving the synthetic, key-point and withheld flags alone.
    ///
    /// Only the low five bits of `class_code` are used.
    pub fn set_class_code(&mut self, class_code: u8) {
        self.classification =
            (self.classification & !CLASS_CODE_MASK) | (class_code & CLASS_CODE_MASK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn transforms() -> Vector<Transform> {
        Vector::splat(Transform::default())
    }

    #[test]
    fn into_raw_and_back() {
        let point = Point {
            x: 42.,
            y: -93.,
            z: 16.,
            intensity: 500,
            return_number: 2,
            number_of_returns: 3,
            scan_direction: ScanDirection::LeftToRight,
            is_edge_of_flight_line: true,
            classification: 2,
            scan_angle_rank: -12,
            user_data: 1,
            point_source_id: 7,
            gps_time: Some(12.5),
            color: Some(Color::new(1, 2, 3)),
            extra_bytes: vec![9],
        };
        let raw_point = point.clone().into_raw(&transforms()).unwrap();
        assert_eq!(0b1101_1010, raw_point.flags);
        assert_eq!(point, Point::new(raw_point, &transforms()));
    }

    #[test]
    fn number_of_returns_too_large() {
        let point = Point {
            number_of_returns: 8,
            ..Default::default()
        };
        assert!(matches!(
            point.into_raw(&transforms()),
            Err(crate::Error::Point(Error::NumberOfReturns(8)))
        ));
    }

    #[test]
    fn unrepresentable_coordinate() {
        let point = Point {
            x: 1e20,
            ..Default::default()
        };
        assert!(matches!(
            point.into_raw(&transforms()),
            Err(crate::Error::InverseTransform(..))
        ));
    }

    #[test]
    fn time_rounds_to_microseconds() {
        let point = Point {
            gps_time: Some(1_205_884_800.250_000_4),
            ..Default::default()
        };
        let time = point.time().unwrap();
        assert_eq!(
            Utc.with_ymd_and_hms(2008, 3, 19, 0, 0, 0).unwrap(),
            time.with_nanosecond(0).unwrap()
        );
        assert_eq!(250_000, time.timestamp_subsec_micros());
    }

    #[test]
    fn time_without_gps_time() {
        assert_eq!(None, Point::default().time());
    }

    #[test]
    fn time_roundtrip() {
        let mut point = Point::default();
        let time = Utc.with_ymd_and_hms(2008, 3, 19, 6, 30, 15).unwrap();
        point.set_time(time);
        assert_eq!(Some(time), point.time());
    }

    #[test]
    fn validate_scan_angle() {
        for scan_angle_rank in [-90, 0, 90] {
            let point = Point {
                scan_angle_rank,
                ..Default::default()
            };
            assert!(point.validate().is_ok());
        }
        let point = Point {
            scan_angle_rank: -91,
            ..Default::default()
        };
        assert!(matches!(
            point.validate(),
            Err(crate::Error::Point(Error::ScanAngleRank(-91)))
        ));
    }

    #[test]
    fn set_color() {
        let mut point = Point::default();
        point.set_color((1, 2, 3));
        assert_eq!(Some(Color::new(1, 2, 3)), point.color);
    }

    #[test]
    fn set_class_code() {
        let mut point = Point {
            classification: 0b1110_0000,
            ..Default::default()
        };
        point.set_class_code(9);
        assert_eq!(9, point.class_code());
        assert!(point.is_synthetic());
        assert!(point.is_key_point());
        assert!(point.is_withheld());
    }

    #[test]
    fn matches_extra_bytes() {
        let mut format = Format::new(0).unwrap();
        format.extra_bytes = 2;
        let point = Point {
            extra_bytes: vec![1],
            ..Default::default()
        };
        assert!(!point.matches(&format));
        assert!(Point::default().matches(&format));
    }
}
