use crate::{Error, Result, header};
use std::fmt;

const BASE_LEN: u16 = 20;
const GPS_TIME_LEN: u16 = 8;
const COLOR_LEN: u16 = 6;

/// Point record format, i.e. which optional fields each point record carries.
///
/// Formats 0 through 3 are supported:
///
/// | Format | GPS time | Color |
/// | ------ | -------- | ----- |
/// | 0 | | |
/// | 1 | x | |
/// | 2 | | x |
/// | 3 | x | x |
///
/// Records may be longer than their format requires, and the surplus is carried as
/// `extra_bytes`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Format {
    /// Does this point format include gps time?
    pub has_gps_time: bool,
    /// Does this point format include red, green, and blue colors?
    pub has_color: bool,
    /// The number of opaque bytes after the fields this format defines.
    pub extra_bytes: u16,
}

impl Format {
    /// Creates a new point format from a u8.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::point::Format;
    /// let format = Format::new(1).unwrap();
    /// assert!(format.has_gps_time);
    /// assert!(!format.has_color);
    /// assert!(Format::new(4).is_err());
    /// ```
    pub fn new(n: u8) -> Result<Format> {
        let (has_gps_time, has_color) = match n {
            0 => (false, false),
            1 => (true, false),
            2 => (false, true),
            3 => (true, true),
            _ => return Err(Error::PointFormat(n)),
        };
        Ok(Format {
            has_gps_time,
            has_color,
            extra_bytes: 0,
        })
    }

    /// Creates a point format from its id and the record length declared in a header.
    ///
    /// Any bytes beyond the format's minimum become `extra_bytes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::point::Format;
    /// let format = Format::with_record_length(0, 24).unwrap();
    /// assert_eq!(4, format.extra_bytes);
    /// assert!(Format::with_record_length(1, 20).is_err());
    /// ```
    pub fn with_record_length(n: u8, len: u16) -> Result<Format> {
        let mut format = Format::new(n)?;
        let minimum = format.len();
        if len < minimum {
            return Err(header::Error::PointDataRecordLength { format, len }.into());
        }
        format.extra_bytes = len - minimum;
        Ok(format)
    }

    /// Returns this format's id.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::point::Format;
    /// assert_eq!(3, Format::new(3).unwrap().to_u8());
    /// ```
    pub fn to_u8(&self) -> u8 {
        match (self.has_gps_time, self.has_color) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    /// Returns the length of one point record in this format, extra bytes included.
    ///
    /// Saturates at `u16::MAX`. Use `checked_len` to find out whether the record fits.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::point::Format;
    /// let mut format = Format::new(0).unwrap();
    /// assert_eq!(20, format.len());
    /// format.has_gps_time = true;
    /// assert_eq!(28, format.len());
    /// format.has_color = true;
    /// assert_eq!(34, format.len());
    /// format.extra_bytes = 1;
    /// assert_eq!(35, format.len());
    /// ```
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u16 {
        self.checked_len().unwrap_or(u16::MAX)
    }

    /// Returns the length of one point record, or `None` if it doesn't fit in 16 bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::point::Format;
    /// let mut format = Format::new(3).unwrap();
    /// format.extra_bytes = u16::MAX - 34;
    /// assert_eq!(Some(u16::MAX), format.checked_len());
    /// format.extra_bytes += 1;
    /// assert_eq!(None, format.checked_len());
    /// ```
    pub fn checked_len(&self) -> Option<u16> {
        let mut len = BASE_LEN.checked_add(self.extra_bytes)?;
        if self.has_gps_time {
            len = len.checked_add(GPS_TIME_LEN)?;
        }
        if self.has_color {
            len = len.checked_add(COLOR_LEN)?;
        }
        Some(len)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point format {}", self.to_u8())
    }
}
