//! Variable length records store metadata that doesn't fit into the header.
//!
//! Vlrs live between the header and the point records, and they carry arbitrary data:
//!
//! ```
//! use lasfile::Vlr;
//! let vlr = Vlr::from_data("lasfile", 42, "Some really important data", vec![1, 2, 3]).unwrap();
//! assert_eq!(3, vlr.record_length);
//! ```
//!
//! The record length is kept separately from the data so that a vlr read from a file is written
//! back exactly as it was found. A vlr whose record length disagrees with its data can't be
//! written.

use crate::{
    Error, Result, raw,
    utils::{AsLasStr, FromLasStr},
};
use std::io::{Read, Write};

/// The user id of the records that describe a spatial reference system.
pub const PROJECTION_USER_ID: &str = "LASF_Projection";

/// A variable length record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vlr {
    /// The user that created this record.
    ///
    /// This value is often an official, "registered" user_id, such as "LASF_Spec" or
    /// "LASF_Projection". At most sixteen bytes.
    pub user_id: String,

    /// This value specifies the type of record, and depends on the user id.
    pub record_id: u16,

    /// Textual description of these data, at most thirty two bytes.
    pub description: String,

    /// The declared number of data bytes.
    pub record_length: u16,

    /// Reserved, should be zero.
    pub reserved: u16,

    /// The data themselves.
    pub data: Vec<u8>,
}

impl Vlr {
    /// Creates a vlr whose record length is taken from its data.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Vlr;
    /// let vlr = Vlr::from_data("lasfile", 1, "", vec![0; 6]).unwrap();
    /// assert_eq!(6, vlr.record_length);
    /// assert!(Vlr::from_data("lasfile", 1, "", vec![0; 70_000]).is_err());
    /// ```
    pub fn from_data(
        user_id: impl Into<String>,
        record_id: u16,
        description: impl Into<String>,
        data: Vec<u8>,
    ) -> Result<Vlr> {
        let record_length = u16::try_from(data.len()).map_err(|_| Error::InconsistentLength {
            what: "vlr",
            declared: usize::from(u16::MAX),
            actual: data.len(),
        })?;
        Ok(Vlr {
            user_id: user_id.into(),
            record_id,
            description: description.into(),
            record_length,
            reserved: 0,
            data,
        })
    }

    /// Creates a vlr from a raw vlr.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::{Vlr, raw};
    /// let raw_vlr = raw::Vlr::default();
    /// let vlr = Vlr::new(raw_vlr).unwrap();
    /// ```
    pub fn new(raw_vlr: raw::Vlr) -> Result<Vlr> {
        Ok(Vlr {
            user_id: raw_vlr.user_id.as_las_str()?.to_string(),
            record_id: raw_vlr.record_id,
            description: raw_vlr.description.as_las_str()?.to_string(),
            record_length: raw_vlr.record_length_after_header,
            reserved: raw_vlr.reserved,
            data: raw_vlr.data,
        })
    }

    /// Converts this vlr to a raw vlr.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Vlr;
    /// let raw_vlr = Vlr::default().into_raw().unwrap();
    /// let vlr = Vlr { user_id: "this user id is too long".to_string(), ..Default::default() };
    /// assert!(vlr.into_raw().is_err());
    /// ```
    pub fn into_raw(self) -> Result<raw::Vlr> {
        let mut user_id = [0; 16];
        user_id.from_las_str(&self.user_id)?;
        let mut description = [0; 32];
        description.from_las_str(&self.description)?;
        Ok(raw::Vlr {
            reserved: self.reserved,
            user_id,
            record_id: self.record_id,
            record_length_after_header: self.record_length,
            description,
            data: self.data,
        })
    }

    /// Reads a vlr.
    pub fn read_from<R: Read>(read: R) -> Result<Vlr> {
        raw::Vlr::read_from(read).and_then(Vlr::new)
    }

    /// Writes this vlr.
    ///
    /// Nothing is written if the record length doesn't match the data.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Vlr;
    /// let vlr = Vlr { record_length: 10, data: vec![0; 6], ..Default::default() };
    /// assert!(vlr.write_to(Vec::new()).is_err());
    /// ```
    pub fn write_to<W: Write>(&self, write: W) -> Result<()> {
        self.clone().into_raw()?.write_to(write)
    }

    /// Returns the total number of bytes this vlr occupies, header and data.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Vlr;
    /// assert_eq!(54, Vlr::default().len());
    /// ```
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        raw::vlr::HEADER_SIZE + usize::from(self.record_length)
    }

    /// Returns true if this vlr describes a spatial reference system.
    pub fn is_projection(&self) -> bool {
        self.user_id == PROJECTION_USER_ID
    }
}
