//! Defines raw las points.

use crate::{Color, Error, Result, point::Format};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

const RETURN_NUMBER_MASK: u8 = 0b0000_0111;
const NUMBER_OF_RETURNS_MASK: u8 = 0b0011_1000;
const SCAN_DIRECTION_MASK: u8 = 0b0100_0000;
const EDGE_OF_FLIGHT_LINE_MASK: u8 = 0b1000_0000;

/// A raw point.
///
/// Which optional fields are physically present is decided by the `Format` that the point is
/// read or written with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Point {
    /// The X, Y, and Z values are stored as long integers.
    ///
    /// The X, Y, and Z values are used in conjunction with the scale values and the offset values
    /// to determine the coordinate for each point.
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
    #[allow(missing_docs)]
    pub z: i32,

    /// The integer representation of the pulse return magnitude.
    pub intensity: u16,

    /// Return number, number of returns, scan direction flag and edge of flight line, packed
    /// into one byte.
    ///
    /// | Bits | Field |
    /// | ---- | ----- |
    /// | 0:2 | Return number |
    /// | 3:5 | Number of returns (given pulse) |
    /// | 6 | Scan direction flag |
    /// | 7 | Edge of flight line |
    pub flags: u8,

    /// The classification byte.
    ///
    /// The low five bits are the ASPRS class, and the three high bits are the synthetic,
    /// key-point and withheld flags.
    pub classification: u8,

    /// The angle, rounded to the nearest degree, at which the pulse was output, including the
    /// roll of the aircraft.
    ///
    /// Should be between -90 and 90, but nothing here enforces that.
    pub scan_angle_rank: i8,

    /// This field may be used at the user’s discretion.
    pub user_data: u8,

    /// The file from which this point originated, zero meaning this file.
    pub point_source_id: u16,

    /// The time tag value at which the point was acquired.
    pub gps_time: Option<f64>,

    /// The red, green, and blue image channels associated with this point.
    pub color: Option<Color>,

    /// Trailing bytes beyond what the point format defines.
    pub extra_bytes: Vec<u8>,
}

impl Point {
    /// Reads a raw point.
    ///
    /// Exactly `format.len()` bytes are consumed. Any bytes beyond the ones the format defines
    /// are kept in `extra_bytes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::raw::Point;
    /// use lasfile::point::Format;
    /// let bytes = [0; 28];
    /// let point = Point::read_from(&bytes[..], Format::new(1).unwrap()).unwrap();
    /// assert_eq!(Some(0.), point.gps_time);
    /// ```
    pub fn read_from<R: Read>(mut read: R, format: Format) -> Result<Point> {
        let x = read.read_i32::<LittleEndian>()?;
        let y = read.read_i32::<LittleEndian>()?;
        let z = read.read_i32::<LittleEndian>()?;
        let intensity = read.read_u16::<LittleEndian>()?;
        let flags = read.read_u8()?;
        let classification = read.read_u8()?;
        let scan_angle_rank = read.read_i8()?;
        let user_data = read.read_u8()?;
        let point_source_id = read.read_u16::<LittleEndian>()?;
        let gps_time = if format.has_gps_time {
            Some(read.read_f64::<LittleEndian>()?)
        } else {
            None
        };
        let color = if format.has_color {
            let red = read.read_u16::<LittleEndian>()?;
            let green = read.read_u16::<LittleEndian>()?;
            let blue = read.read_u16::<LittleEndian>()?;
            Some(Color::new(red, green, blue))
        } else {
            None
        };
        let mut extra_bytes = vec![0; usize::from(format.extra_bytes)];
        read.read_exact(&mut extra_bytes)?;
        Ok(Point {
            x,
            y,
            z,
            intensity,
            flags,
            classification,
            scan_angle_rank,
            user_data,
            point_source_id,
            gps_time,
            color,
            extra_bytes,
        })
    }

    /// Writes a raw point.
    ///
    /// The point is checked against the format before any bytes are written, so a failed write
    /// leaves `write` untouched. A point without gps time or color is written with zeros in those
    /// fields if the format has them, but a point with a field the format lacks is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::raw::Point;
    /// use lasfile::point::Format;
    /// let mut bytes = Vec::new();
    /// let point = Point { gps_time: Some(42.), ..Default::default() };
    /// assert!(point.write_to(&mut bytes, Format::new(0).unwrap()).is_err());
    /// point.write_to(&mut bytes, Format::new(1).unwrap()).unwrap();
    /// assert_eq!(28, bytes.len());
    /// ```
    pub fn write_to<W: Write>(&self, mut write: W, format: Format) -> Result<()> {
        let bytes = self.to_bytes(format)?;
        write.write_all(&bytes)?;
        Ok(())
    }

    /// Encodes this point into exactly `format.len()` bytes.
    pub fn to_bytes(&self, format: Format) -> Result<Vec<u8>> {
        if self.gps_time.is_some() && !format.has_gps_time {
            return Err(Error::UnsupportedField {
                format: format.to_u8(),
                field: "gps time",
            });
        }
        if self.color.is_some() && !format.has_color {
            return Err(Error::UnsupportedField {
                format: format.to_u8(),
                field: "color",
            });
        }
        if !self.extra_bytes.is_empty() && self.extra_bytes.len() != usize::from(format.extra_bytes)
        {
            return Err(Error::InconsistentLength {
                what: "point extra bytes",
                declared: usize::from(format.extra_bytes),
                actual: self.extra_bytes.len(),
            });
        }

        let mut bytes = Vec::with_capacity(usize::from(format.len()));
        bytes.write_i32::<LittleEndian>(self.x)?;
        bytes.write_i32::<LittleEndian>(self.y)?;
        bytes.write_i32::<LittleEndian>(self.z)?;
        bytes.write_u16::<LittleEndian>(self.intensity)?;
        bytes.write_u8(self.flags)?;
        bytes.write_u8(self.classification)?;
        bytes.write_i8(self.scan_angle_rank)?;
        bytes.write_u8(self.user_data)?;
        bytes.write_u16::<LittleEndian>(self.point_source_id)?;
        if format.has_gps_time {
            bytes.write_f64::<LittleEndian>(self.gps_time.unwrap_or(0.))?;
        }
        if format.has_color {
            let color = self.color.unwrap_or_default();
            bytes.write_u16::<LittleEndian>(color.red)?;
            bytes.write_u16::<LittleEndian>(color.green)?;
            bytes.write_u16::<LittleEndian>(color.blue)?;
        }
        if self.extra_bytes.is_empty() {
            bytes.resize(usize::from(format.len()), 0);
        } else {
            bytes.extend_from_slice(&self.extra_bytes);
        }
        Ok(bytes)
    }

    /// Returns the return number, bits 0 through 2 of the flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::raw::Point;
    /// let point = Point { flags: 0b1111_1010, ..Default::default() };
    /// assert_eq!(2, point.return_number());
    /// ```
    pub fn return_number(&self) -> u8 {
        self.flags & RETURN_NUMBER_MASK
    }

    /// Returns the number of returns, bits 3 through 5 of the flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::raw::Point;
    /// let point = Point { flags: 0b0001_0000, ..Default::default() };
    /// assert_eq!(2, point.number_of_returns());
    /// ```
    pub fn number_of_returns(&self) -> u8 {
        (self.flags & NUMBER_OF_RETURNS_MASK) >> 3
    }

    /// Returns true if the scan direction bit, bit 6, is set.
    pub fn scan_direction_flag(&self) -> bool {
        self.flags & SCAN_DIRECTION_MASK == SCAN_DIRECTION_MASK
    }

    /// Returns true if the edge of flight line bit, bit 7, is set.
    pub fn edge_of_flight_line(&self) -> bool {
        self.flags & EDGE_OF_FLIGHT_LINE_MASK == EDGE_OF_FLIGHT_LINE_MASK
    }

    /// Sets the return number, leaving the other flags alone.
    ///
    /// Only the low three bits of `n` are used.
    pub fn set_return_number(&mut self, n: u8) {
        self.flags = (self.flags & !RETURN_NUMBER_MASK) | (n & RETURN_NUMBER_MASK);
    }

    /// Sets the number of returns, leaving the other flags alone.
    ///
    /// Only the low three bits of `n` are used.
    pub fn set_number_of_returns(&mut self, n: u8) {
        self.flags = (self.flags & !NUMBER_OF_RETURNS_MASK) | ((n << 3) & NUMBER_OF_RETURNS_MASK);
    }

    /// Sets or clears the scan direction bit.
    pub fn set_scan_direction_flag(&mut self, flag: bool) {
        if flag {
            self.flags |= SCAN_DIRECTION_MASK;
        } else {
            self.flags &= !SCAN_DIRECTION_MASK;
        }
    }

    /// Sets or clears the edge of flight line bit.
    pub fn set_edge_of_flight_line(&mut self, flag: bool) {
        if flag {
            self.flags |= EDGE_OF_FLIGHT_LINE_MASK;
        } else {
            self.flags &= !EDGE_OF_FLIGHT_LINE_MASK;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! roundtrip {
        ($name:ident, $format:expr) => {
            mod $name {
                #[test]
                fn roundtrip() {
                    use super::*;

                    let mut format = Format::new($format).unwrap();
                    format.extra_bytes = 1;
                    let mut point = Point {
                        x: -1,
                        y: i32::MAX,
                        z: i32::MIN,
                        intensity: 500,
                        flags: 0b1101_0010,
                        classification: 2,
                        scan_angle_rank: -90,
                        user_data: 7,
                        point_source_id: 12,
                        extra_bytes: vec![42],
                        ..Default::default()
                    };
                    if format.has_gps_time {
                        point.gps_time = Some(1234.5678);
                    }
                    if format.has_color {
                        point.color = Some(Color::new(1, 2, 3));
                    }
                    let mut bytes = Vec::new();
                    point.write_to(&mut bytes, format).unwrap();
                    assert_eq!(usize::from(format.len()), bytes.len());
                    assert_eq!(point, Point::read_from(&bytes[..], format).unwrap());
                }
            }
        };
    }

    roundtrip!(format_0, 0);
    roundtrip!(format_1, 1);
    roundtrip!(format_2, 2);
    roundtrip!(format_3, 3);

    #[test]
    fn flags_masks() {
        let mut point = Point::default();
        point.set_return_number(3);
        point.set_number_of_returns(5);
        point.set_scan_direction_flag(true);
        point.set_edge_of_flight_line(true);
        assert_eq!(0b1110_1011, point.flags);
        assert_eq!(3, point.return_number());
        assert_eq!(5, point.number_of_returns());
        assert!(point.scan_direction_flag());
        assert!(point.edge_of_flight_line());

        point.set_return_number(0);
        point.set_scan_direction_flag(false);
        assert_eq!(0b1010_1000, point.flags);
    }

    #[test]
    fn every_flags_byte_roundtrips() {
        for flags in 0..=u8::MAX {
            let point = Point {
                flags,
                ..Default::default()
            };
            let mut rebuilt = Point::default();
            rebuilt.set_return_number(point.return_number());
            rebuilt.set_number_of_returns(point.number_of_returns());
            rebuilt.set_scan_direction_flag(point.scan_direction_flag());
            rebuilt.set_edge_of_flight_line(point.edge_of_flight_line());
            assert_eq!(flags, rebuilt.flags);
        }
    }

    #[test]
    fn unsupported_color() {
        let point = Point {
            color: Some(Color::new(1, 2, 3)),
            ..Default::default()
        };
        let mut bytes = Vec::new();
        assert!(matches!(
            point.write_to(&mut bytes, Format::new(1).unwrap()),
            Err(Error::UnsupportedField { format: 1, .. })
        ));
        assert!(bytes.is_empty());
    }

    #[test]
    fn missing_optional_fields_are_zeroed() {
        let format = Format::new(3).unwrap();
        let bytes = Point::default().to_bytes(format).unwrap();
        let point = Point::read_from(&bytes[..], format).unwrap();
        assert_eq!(Some(0.), point.gps_time);
        assert_eq!(Some(Color::default()), point.color);
    }

    #[test]
    fn empty_extra_bytes_are_zero_filled() {
        let mut format = Format::new(0).unwrap();
        format.extra_bytes = 4;
        let bytes = Point::default().to_bytes(format).unwrap();
        assert_eq!(24, bytes.len());
        assert_eq!([0u8; 4], bytes[20..]);
    }

    #[test]
    fn wrong_extra_bytes() {
        let mut format = Format::new(0).unwrap();
        format.extra_bytes = 4;
        let point = Point {
            extra_bytes: vec![1, 2],
            ..Default::default()
        };
        assert!(matches!(
            point.to_bytes(format),
            Err(Error::InconsistentLength { .. })
        ));
    }
}
