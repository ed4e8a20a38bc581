//! Raw variable length records.

use crate::{Error, Result, utils};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// The number of bytes in a vlr header, before its data.
pub const HEADER_SIZE: usize = 54;

/// A raw VLR that maps directly onto the LAS specification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vlr {
    /// Must be zero, though older files sometimes used 0xAABB.
    pub reserved: u16,

    /// The user that created this record, as nul-filled bytes.
    pub user_id: [u8; 16],

    /// The type of record, which depends on the user id.
    pub record_id: u16,

    /// The number of data bytes that follow the vlr header.
    pub record_length_after_header: u16,

    /// Textual description of the data, as nul-filled bytes.
    pub description: [u8; 32],

    /// The data themselves.
    pub data: Vec<u8>,
}

impl Vlr {
    /// Reads a raw VLR.
    ///
    /// Reads exactly `record_length_after_header` bytes of data, and errors if the stream ends
    /// before they are all there.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::raw::Vlr;
    /// let mut bytes = vec![0; 54];
    /// bytes[20] = 2; // record length after header
    /// bytes.extend([1, 2]);
    /// let vlr = Vlr::read_from(&bytes[..]).unwrap();
    /// assert_eq!(vec![1, 2], vlr.data);
    /// ```
    pub fn read_from<R: Read>(mut read: R) -> Result<Vlr> {
        let mut header = [0; HEADER_SIZE];
        if !utils::read_record(&mut read, &mut header, "vlr header")? {
            return Err(Error::TruncatedRecord {
                record: "vlr header",
                expected: HEADER_SIZE,
                actual: 0,
            });
        }
        let mut header = &header[..];
        let reserved = header.read_u16::<LittleEndian>()?;
        let mut user_id = [0; 16];
        header.read_exact(&mut user_id)?;
        let record_id = header.read_u16::<LittleEndian>()?;
        let record_length_after_header = header.read_u16::<LittleEndian>()?;
        let mut description = [0; 32];
        header.read_exact(&mut description)?;

        let mut data = vec![0; usize::from(record_length_after_header)];
        let n = utils::read_fully(&mut read, &mut data)?;
        if n < data.len() {
            return Err(Error::TruncatedRecord {
                record: "vlr",
                expected: data.len(),
                actual: n,
            });
        }
        Ok(Vlr {
            reserved,
            user_id,
            record_id,
            record_length_after_header,
            description,
            data,
        })
    }

    /// Writes a raw VLR.
    ///
    /// The data must be exactly as long as `record_length_after_header` says, and nothing is
    /// written if it isn't.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::raw::Vlr;
    /// let vlr = Vlr { record_length_after_header: 10, data: vec![0; 6], ..Default::default() };
    /// let mut bytes = Vec::new();
    /// assert!(vlr.write_to(&mut bytes).is_err());
    /// assert!(bytes.is_empty());
    /// ```
    pub fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        if usize::from(self.record_length_after_header) != self.data.len() {
            return Err(Error::InconsistentLength {
                what: "vlr",
                declared: usize::from(self.record_length_after_header),
                actual: self.data.len(),
            });
        }
        write.write_u16::<LittleEndian>(self.reserved)?;
        write.write_all(&self.user_id)?;
        write.write_u16::<LittleEndian>(self.record_id)?;
        write.write_u16::<LittleEndian>(self.record_length_after_header)?;
        write.write_all(&self.description)?;
        write.write_all(&self.data)?;
        Ok(())
    }

    /// Returns the number of bytes this vlr takes up on disk.
    pub fn len(&self) -> usize {
        HEADER_SIZE + usize::from(self.record_length_after_header)
    }

    /// Returns true if this vlr has no data.
    pub fn is_empty(&self) -> bool {
        self.record_length_after_header == 0
    }
}
