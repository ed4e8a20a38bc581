//! Headers describe the layout of a las file and summarize its points.
//!
//! A header is read once when a file is opened, and it decides how every point record is decoded:
//!
//! ```
//! use lasfile::Header;
//! let header = Header::default();
//! assert_eq!(20, header.point_format.len());
//! assert_eq!(227, header.offset_to_point_data());
//! ```
//!
//! The summary fields (point count, return histogram and bounds) aren't maintained by the
//! writer. Use `add_point` for each written point, or `File::summarize` after the fact.
//!
//! Use a `Builder` to configure a new header with checks on the combination of settings.

mod builder;

pub use self::builder::Builder;

use crate::{
    Bounds, GpsTimeType, Guid, Point, Result, Srs, Transform, Vector, Version, Vlr,
    point::Format,
    raw::{self, Evlr, LASF, LargeFile},
    utils::{self, AsLasStr, FromLasStr},
};
use chrono::{Datelike, Days, NaiveDate, Utc};
use log::{debug, warn};
use std::io::{Read, Write};
use thiserror::Error;

/// The number of return buckets a header keeps.
pub const RETURN_BUCKETS: usize = 8;

const LEGACY_RETURN_BUCKETS: usize = 5;
const MAX_IDENTIFIER_LEN: usize = 31;

/// Header-specific errors.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// This version can't be read or written.
    #[error("version {0} is not supported")]
    Version(Version),

    /// The header size is too small for the version.
    #[error("header size {header_size} is too small for version {version}")]
    HeaderSize {
        /// The version of the header.
        version: Version,
        /// The declared header size.
        header_size: u16,
    },

    /// The point data record length is too small for the format.
    #[error("{format} needs at least {} bytes per record, but the header declares {len}", .format.len())]
    PointDataRecordLength {
        /// The point format.
        format: Format,
        /// The declared record length.
        len: u16,
    },

    /// The point format's extra bytes push its record length past 16 bits.
    #[error("{format} with {} extra bytes doesn't fit in a 16-bit record length", .format.extra_bytes)]
    RecordLengthOverflow {
        /// The point format.
        format: Format,
    },

    /// The offset to the point data doesn't leave room for the header and vlrs.
    #[error("point data offset {offset} is smaller than the {minimum} bytes of header and vlrs")]
    OffsetToPointData {
        /// The declared offset.
        offset: u32,
        /// The number of bytes taken by the header and vlrs.
        minimum: u64,
    },

    /// The header and vlrs are too big to be addressed.
    #[error("the header and vlrs take {0} bytes, which doesn't fit in 32 bits")]
    OffsetTooLarge(u64),

    /// There are too many points (or points of one return) for this version.
    #[error("version {version} can't store a count of {count} points")]
    TooManyPoints {
        /// The las version.
        version: Version,
        /// The count.
        count: u64,
    },

    /// More return buckets were given than a header has.
    #[error("a header has eight return buckets, got {0}")]
    TooManyReturnBuckets(usize),

    /// This version only stores the first five return buckets.
    #[error("version {version} can't store points in return bucket {index}")]
    ReturnBucket {
        /// The las version.
        version: Version,
        /// The zero-based index of the bucket.
        index: usize,
    },

    /// A feature isn't supported by this version.
    #[error("version {version} does not support {feature}")]
    Unsupported {
        /// The las version.
        version: Version,
        /// The feature.
        feature: &'static str,
    },

    /// The point layout was changed after points were written.
    #[error("the point layout can't change after the header is written")]
    LayoutChanged,
}

/// Metadata describing the layout, source, and interpretation of the points.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// A numeric identifier for this file, often the flight line.
    pub file_source_id: u16,

    /// Bit flags, reserved before version 1.2.
    ///
    /// The lowest bit is the gps time type, see `gps_time_type`.
    pub global_encoding: u16,

    /// The project id, nil if there isn't one.
    pub guid: Guid,

    /// The las version.
    pub version: Version,

    /// The system that generated the points.
    ///
    /// Truncated to 31 bytes when written.
    pub system_identifier: String,

    /// The software that created this file.
    ///
    /// Truncated to 31 bytes when written.
    pub generating_software: String,

    /// The creation day, counted in days after January first.
    pub creation_day_of_year: u16,

    /// The creation year.
    pub creation_year: u16,

    /// The format of the point records, including any extra bytes.
    pub point_format: Format,

    /// The scales and offsets of the coordinates.
    pub transforms: Vector<Transform>,

    /// The bounds of the points, in real world coordinates.
    pub bounds: Bounds,

    /// The declared number of points.
    ///
    /// This may disagree with the number of records that are actually in the file.
    pub number_of_points: u64,

    /// The variable length records.
    pub vlrs: Vec<Vlr>,

    /// Bytes at the end of the header beyond what its version defines.
    pub padding: Vec<u8>,

    /// Bytes between the last vlr and the first point.
    pub vlr_padding: Vec<u8>,

    /// The start of the waveform data packet record, las 1.3 and later.
    pub start_of_waveform_data_packet_record: Option<u64>,

    /// The position and count of extended vlrs, las 1.4.
    ///
    /// Extended vlrs themselves aren't read, but their location is kept.
    pub evlr: Option<Evlr>,

    number_of_points_by_return: [u64; RETURN_BUCKETS],
}

impl Header {
    /// Creates a header from a raw header, without any vlrs.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::{Header, raw};
    /// let header = Header::from_raw(raw::Header::default()).unwrap();
    /// assert!(header.vlrs.is_empty());
    /// ```
    pub fn from_raw(raw_header: raw::Header) -> Result<Header> {
        if !raw_header.version.is_supported() {
            return Err(Error::Version(raw_header.version).into());
        }
        let point_format = Format::with_record_length(
            raw_header.point_data_record_format,
            raw_header.point_data_record_length,
        )?;

        let mut number_of_points = u64::from(raw_header.number_of_point_records);
        let mut number_of_points_by_return = [0; RETURN_BUCKETS];
        for (bucket, &n) in number_of_points_by_return
            .iter_mut()
            .zip(&raw_header.number_of_points_by_return)
        {
            *bucket = u64::from(n);
        }
        if let Some(large_file) = raw_header.large_file {
            if large_file.number_of_point_records != 0 {
                number_of_points = large_file.number_of_point_records;
            }
            if large_file.number_of_points_by_return.iter().any(|&n| n != 0) {
                number_of_points_by_return
                    .copy_from_slice(&large_file.number_of_points_by_return[..RETURN_BUCKETS]);
            }
            if large_file.number_of_points_by_return[RETURN_BUCKETS..]
                .iter()
                .any(|&n| n != 0)
            {
                warn!("dropping counts for return numbers above eight");
            }
        }

        Ok(Header {
            file_source_id: raw_header.file_source_id,
            global_encoding: raw_header.global_encoding,
            guid: Guid::from_bytes(raw_header.guid),
            version: raw_header.version,
            system_identifier: raw_header.system_identifier.as_las_str()?.to_string(),
            generating_software: raw_header.generating_software.as_las_str()?.to_string(),
            creation_day_of_year: raw_header.file_creation_day_of_year,
            creation_year: raw_header.file_creation_year,
            point_format,
            transforms: Vector {
                x: Transform {
                    scale: raw_header.x_scale_factor,
                    offset: raw_header.x_offset,
                },
                y: Transform {
                    scale: raw_header.y_scale_factor,
                    offset: raw_header.y_offset,
                },
                z: Transform {
                    scale: raw_header.z_scale_factor,
                    offset: raw_header.z_offset,
                },
            },
            bounds: Bounds {
                min: Vector {
                    x: raw_header.min_x,
                    y: raw_header.min_y,
                    z: raw_header.min_z,
                },
                max: Vector {
                    x: raw_header.max_x,
                    y: raw_header.max_y,
                    z: raw_header.max_z,
                },
            },
            number_of_points,
            vlrs: Vec::new(),
            padding: raw_header.padding,
            vlr_padding: Vec::new(),
            start_of_waveform_data_packet_record: raw_header.start_of_waveform_data_packet_record,
            evlr: raw_header.evlr,
            number_of_points_by_return,
        })
    }

    /// Converts this header into a raw header.
    ///
    /// Identifiers longer than 31 bytes are truncated.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Header;
    /// let raw_header = Header::default().into_raw().unwrap();
    /// assert_eq!(227, raw_header.header_size);
    /// ```
    pub fn into_raw(&self) -> Result<raw::Header> {
        let version = self.version;
        if !version.is_supported() {
            return Err(Error::Version(version).into());
        }
        self.transforms.x.validate()?;
        self.transforms.y.validate()?;
        self.transforms.z.validate()?;

        let point_data_record_length =
            self.point_format.checked_len().ok_or(Error::RecordLengthOverflow {
                format: self.point_format,
            })?;
        let header_size = self.header_size()?;
        let offset_to_point_data = self.offset_to_point_data_checked()?;
        let number_of_variable_length_records = u32::try_from(self.vlrs.len())
            .map_err(|_| Error::OffsetTooLarge(self.offset_to_point_data()))?;

        let (number_of_point_records, number_of_points_by_return, large_file) =
            if version.has_large_files() {
                let mut large_file = LargeFile {
                    number_of_point_records: self.number_of_points,
                    ..Default::default()
                };
                large_file.number_of_points_by_return[..RETURN_BUCKETS]
                    .copy_from_slice(&self.number_of_points_by_return);
                let legacy = self.legacy_counts().unwrap_or_default();
                (legacy.0, legacy.1, Some(large_file))
            } else {
                if let Some(index) = self.number_of_points_by_return[LEGACY_RETURN_BUCKETS..]
                    .iter()
                    .position(|&n| n != 0)
                {
                    return Err(Error::ReturnBucket {
                        version,
                        index: index + LEGACY_RETURN_BUCKETS,
                    }
                    .into());
                }
                let (count, by_return) = self.legacy_counts().ok_or(Error::TooManyPoints {
                    version,
                    count: self.number_of_points,
                })?;
                (count, by_return, None)
            };

        let mut system_identifier = [0; 32];
        system_identifier.from_las_str(self.truncated("system identifier", &self.system_identifier))?;
        let mut generating_software = [0; 32];
        generating_software
            .from_las_str(self.truncated("generating software", &self.generating_software))?;

        Ok(raw::Header {
            file_signature: LASF,
            file_source_id: self.file_source_id,
            global_encoding: self.global_encoding,
            guid: self.guid.to_bytes(),
            version,
            system_identifier,
            generating_software,
            file_creation_day_of_year: self.creation_day_of_year,
            file_creation_year: self.creation_year,
            header_size,
            offset_to_point_data,
            number_of_variable_length_records,
            point_data_record_format: self.point_format.to_u8(),
            point_data_record_length,
            number_of_point_records,
            number_of_points_by_return,
            x_scale_factor: self.transforms.x.scale,
            y_scale_factor: self.transforms.y.scale,
            z_scale_factor: self.transforms.z.scale,
            x_offset: self.transforms.x.offset,
            y_offset: self.transforms.y.offset,
            z_offset: self.transforms.z.offset,
            max_x: self.bounds.max.x,
            min_x: self.bounds.min.x,
            max_y: self.bounds.max.y,
            min_y: self.bounds.min.y,
            max_z: self.bounds.max.z,
            min_z: self.bounds.min.z,
            start_of_waveform_data_packet_record: self
                .start_of_waveform_data_packet_record
                .filter(|_| version.has_waveforms()),
            evlr: self.evlr.filter(|_| version.has_evlrs()),
            large_file,
            padding: self.padding.clone(),
        })
    }

    /// Reads a header, its vlrs, and any padding before the points.
    ///
    /// Leaves `read` positioned at the first point record.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Header;
    /// let mut bytes = Vec::new();
    /// Header::default().write_to(&mut bytes).unwrap();
    /// let header = Header::read_from(&bytes[..]).unwrap();
    /// ```
    pub fn read_from<R: Read>(mut read: R) -> Result<Header> {
        let raw_header = raw::Header::read_from(&mut read)?;
        let offset = raw_header.offset_to_point_data;
        let number_of_vlrs = raw_header.number_of_variable_length_records;
        let mut position = u64::from(raw_header.header_size);
        let mut header = Header::from_raw(raw_header)?;
        for _ in 0..number_of_vlrs {
            let vlr = Vlr::read_from(&mut read)?;
            position += vlr.len() as u64;
            header.vlrs.push(vlr);
        }
        if position > u64::from(offset) {
            return Err(Error::OffsetToPointData {
                offset,
                minimum: position,
            }
            .into());
        }
        let expected = u64::from(offset) - position;
        let n = read
            .by_ref()
            .take(expected)
            .read_to_end(&mut header.vlr_padding)?;
        if (n as u64) < expected {
            return Err(crate::Error::TruncatedRecord {
                record: "vlr padding",
                expected: expected as usize,
                actual: n,
            });
        }
        Ok(header)
    }

    /// Writes this header, its vlrs, and its vlr padding.
    ///
    /// Everything is encoded before anything is written, so an invalid header leaves `write`
    /// untouched. The same header always produces the same bytes.
    pub fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        let bytes = self.to_bytes()?;
        write.write_all(&bytes)?;
        Ok(())
    }

    /// Encodes everything before the point records.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let raw_header = self.into_raw()?;
        let mut bytes = Vec::with_capacity(raw_header.offset_to_point_data as usize);
        raw_header.write_to(&mut bytes)?;
        for vlr in &self.vlrs {
            vlr.write_to(&mut bytes)?;
        }
        bytes.extend_from_slice(&self.vlr_padding);
        Ok(bytes)
    }

    /// Returns the file signature, which is always "LASF".
    pub fn file_signature(&self) -> [u8; 4] {
        LASF
    }

    /// Returns the size of the header, without vlrs.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::{Header, Version};
    /// let mut header = Header::default();
    /// assert_eq!(227, header.header_size().unwrap());
    /// header.version = Version::new(1, 4);
    /// assert_eq!(375, header.header_size().unwrap());
    /// ```
    pub fn header_size(&self) -> Result<u16> {
        let size = usize::from(self.version.header_size()) + self.padding.len();
        u16::try_from(size).map_err(|_| Error::OffsetTooLarge(size as u64).into())
    }

    /// Returns the byte offset to the first point record.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::{Header, Vlr};
    /// let mut header = Header::default();
    /// header.vlrs.push(Vlr::from_data("lasfile", 1, "", vec![0; 10]).unwrap());
    /// assert_eq!(227 + 54 + 10, header.offset_to_point_data());
    /// ```
    pub fn offset_to_point_data(&self) -> u64 {
        u64::from(self.version.header_size())
            + self.padding.len() as u64
            + self.vlrs.iter().map(|vlr| vlr.len() as u64).sum::<u64>()
            + self.vlr_padding.len() as u64
    }

    fn offset_to_point_data_checked(&self) -> Result<u32> {
        let offset = self.offset_to_point_data();
        u32::try_from(offset).map_err(|_| Error::OffsetTooLarge(offset).into())
    }

    /// Returns the number of points of each return number, one through eight.
    pub fn number_of_points_by_return(&self) -> [u64; RETURN_BUCKETS] {
        self.number_of_points_by_return
    }

    /// Sets the number of points of each return number, starting with return number one.
    ///
    /// Buckets that aren't given are set to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Header;
    /// let mut header = Header::default();
    /// header.set_number_of_points_by_return(&[5, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    /// assert_eq!([5, 0, 0, 0, 0, 0, 0, 0], header.number_of_points_by_return());
    /// assert!(header.set_number_of_points_by_return(&[0; 9]).is_err());
    /// ```
    pub fn set_number_of_points_by_return(&mut self, counts: &[u64]) -> Result<()> {
        if counts.len() > RETURN_BUCKETS {
            return Err(Error::TooManyReturnBuckets(counts.len()).into());
        }
        self.number_of_points_by_return = [0; RETURN_BUCKETS];
        self.number_of_points_by_return[..counts.len()].copy_from_slice(counts);
        Ok(())
    }

    /// Returns the creation date, or `None` if it isn't set or isn't a date.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Header;
    /// use chrono::NaiveDate;
    /// let mut header = Header::default();
    /// header.creation_year = 2008;
    /// header.creation_day_of_year = 78;
    /// assert_eq!(NaiveDate::from_ymd_opt(2008, 3, 19), header.date());
    /// ```
    pub fn date(&self) -> Option<NaiveDate> {
        if self.creation_year == 0 && self.creation_day_of_year == 0 {
            return None;
        }
        NaiveDate::from_yo_opt(i32::from(self.creation_year), 1)?
            .checked_add_days(Days::new(u64::from(self.creation_day_of_year)))
    }

    /// Sets the creation date.
    ///
    /// Only the year and the day within the year are stored. Years outside of 0 through 65535
    /// are clamped.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.creation_year = date.year().clamp(0, i32::from(u16::MAX)) as u16;
        self.creation_day_of_year = date.ordinal0() as u16;
    }

    /// Returns the meaning of the gps times in the point records.
    pub fn gps_time_type(&self) -> GpsTimeType {
        self.global_encoding.into()
    }

    /// Sets the meaning of the gps times in the point records.
    pub fn set_gps_time_type(&mut self, gps_time_type: GpsTimeType) {
        self.global_encoding = gps_time_type.apply_to(self.global_encoding);
    }

    /// Counts a point in the point count, return histogram, and bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::{Header, Point};
    /// let mut header = Header::default();
    /// header.add_point(&Point { x: 1., y: 2., z: 3., return_number: 1, ..Default::default() });
    /// assert_eq!(1, header.number_of_points);
    /// assert_eq!(1, header.number_of_points_by_return()[0]);
    /// assert_eq!(1., header.bounds.min.x);
    /// ```
    pub fn add_point(&mut self, point: &Point) {
        if self.number_of_points == 0 {
            self.bounds = Bounds::empty();
        }
        self.number_of_points += 1;
        if (1..=RETURN_BUCKETS).contains(&usize::from(point.return_number)) {
            self.number_of_points_by_return[usize::from(point.return_number) - 1] += 1;
        }
        self.bounds.grow(point);
    }

    /// Resets the point count, return histogram, and bounds.
    pub fn clear_summary(&mut self) {
        self.number_of_points = 0;
        self.number_of_points_by_return = [0; RETURN_BUCKETS];
        self.bounds = Bounds::default();
    }

    /// Returns the spatial reference system carried by this header's vlrs, if any.
    pub fn srs(&self) -> Option<Srs> {
        Srs::from_vlrs(self.vlrs.iter().cloned())
    }

    /// Replaces this header's projection vlrs with those of a spatial reference system.
    pub fn set_srs(&mut self, srs: Srs) {
        self.remove_srs();
        self.vlrs.extend(srs.into_vlrs());
    }

    /// Removes all projection vlrs from this header.
    pub fn remove_srs(&mut self) {
        self.vlrs.retain(|vlr| !vlr.is_projection());
    }

    pub(crate) fn layout(&self) -> (Format, u64) {
        (self.point_format, self.offset_to_point_data())
    }

    fn legacy_counts(&self) -> Option<(u32, [u32; LEGACY_RETURN_BUCKETS])> {
        let count = u32::try_from(self.number_of_points).ok()?;
        let mut by_return = [0; LEGACY_RETURN_BUCKETS];
        for (legacy, &n) in by_return.iter_mut().zip(&self.number_of_points_by_return) {
            *legacy = u32::try_from(n).ok()?;
        }
        Some((count, by_return))
    }

    fn truncated<'a>(&self, field: &str, s: &'a str) -> &'a str {
        let truncated = utils::truncate(s, MAX_IDENTIFIER_LEN);
        if truncated.len() < s.len() {
            debug!("truncating {field} {s:?} to {truncated:?}");
        }
        truncated
    }
}

impl Default for Header {
    fn default() -> Header {
        let today = Utc::now().date_naive();
        let mut header = Header {
            file_source_id: 0,
            global_encoding: 0,
            guid: Guid::nil(),
            version: Version::default(),
            system_identifier: "lasfile".to_string(),
            generating_software: format!("lasfile {}", env!("CARGO_PKG_VERSION")),
            creation_day_of_year: 0,
            creation_year: 0,
            point_format: Format::default(),
            transforms: Vector::splat(Transform::default()),
            bounds: Bounds::default(),
            number_of_points: 0,
            vlrs: Vec::new(),
            padding: Vec::new(),
            vlr_padding: Vec::new(),
            start_of_waveform_data_packet_record: None,
            evlr: None,
            number_of_points_by_return: [0; RETURN_BUCKETS],
        };
        header.set_date(today);
        header
    }
}
