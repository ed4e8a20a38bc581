//! Raw file metadata.

use crate::{Error, Result, Version, header, raw::LASF, utils};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

/// The number of bytes in the header fields that every version shares.
const COMMON_HEADER_SIZE: usize = 227;

/// A las header.
///
/// The documentation for each member is taken from the las 1.2 spec, with notes about the fields
/// that were added by las 1.3 and 1.4.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// The file signature must contain the four characters “LASF”.
    pub file_signature: [u8; 4],

    /// This field should be set to a value between 1 and 65,535, inclusive.
    ///
    /// A value of zero (0) is interpreted to mean that an ID has not been assigned. In las 1.0
    /// these two bytes are reserved.
    pub file_source_id: u16,

    /// A bit field used to indicate certain global properties about the file.
    ///
    /// Reserved in las 1.0 and 1.1. From las 1.2 on, the low bit selects the gps time type.
    pub global_encoding: u16,

    /// The project id, as a guid in its on-disk byte order.
    pub guid: [u8; 16],

    /// The version number consists of a major and minor field.
    pub version: Version,

    /// Identifies the hardware or the operation that produced the file, e.g. "MERGE" or
    /// "EXTRACTION".
    pub system_identifier: [u8; 32],

    /// Identifies the generating software, e.g. “TerraScan V-10.8”.
    pub generating_software: [u8; 32],

    /// Day, expressed as an unsigned short, on which this file was created.
    pub file_creation_day_of_year: u16,

    /// The year, expressed as a four digit number, in which the file was created.
    pub file_creation_year: u16,

    /// The size, in bytes, of the Public Header Block itself.
    pub header_size: u16,

    /// The number of bytes from the beginning of the file to the first point record.
    pub offset_to_point_data: u32,

    /// The number of Variable Length Records that follow the header.
    pub number_of_variable_length_records: u32,

    /// The point data format id.
    pub point_data_record_format: u8,

    /// The size, in bytes, of the Point Data Record.
    pub point_data_record_length: u16,

    /// The total number of point records within the file.
    pub number_of_point_records: u32,

    /// The number of point records for each of the first five returns.
    pub number_of_points_by_return: [u32; 5],

    /// Scale factors for x, y, and z.
    pub x_scale_factor: f64,
    #[allow(missing_docs)]
    pub y_scale_factor: f64,
    #[allow(missing_docs)]
    pub z_scale_factor: f64,

    /// Offsets for x, y, and z.
    ///
    /// Xcoordinate = (Xrecord * Xscale) + Xoffset
    pub x_offset: f64,
    #[allow(missing_docs)]
    pub y_offset: f64,
    #[allow(missing_docs)]
    pub z_offset: f64,

    /// The actual extents of the point data, in real-world coordinates.
    pub max_x: f64,
    #[allow(missing_docs)]
    pub min_x: f64,
    #[allow(missing_docs)]
    pub max_y: f64,
    #[allow(missing_docs)]
    pub min_y: f64,
    #[allow(missing_docs)]
    pub max_z: f64,
    #[allow(missing_docs)]
    pub min_z: f64,

    /// **las 1.3 and 1.4**: The offset, in bytes, to the first byte of the waveform data packet
    /// record.
    pub start_of_waveform_data_packet_record: Option<u64>,

    /// **las 1.4**: Where the extended variable length records are, and how many.
    pub evlr: Option<Evlr>,

    /// **las 1.4**: 64-bit point counts.
    pub large_file: Option<LargeFile>,

    /// Any bytes between the end of the standard header and `header_size`.
    pub padding: Vec<u8>,
}

/// The extended variable length record fields of a las 1.4 header.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Evlr {
    /// The offset, in bytes, to the first byte of the first EVLR.
    pub start_of_first_evlr: u64,

    /// The number of EVLRs stored after the point data records.
    pub number_of_evlrs: u32,
}

/// The 64-bit point count fields of a las 1.4 header.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LargeFile {
    /// The total number of point records in the file.
    pub number_of_point_records: u64,

    /// The number of point records for each of fifteen returns.
    pub number_of_points_by_return: [u64; 15],
}

impl Header {
    /// Reads a raw header from a `Read`.
    ///
    /// The signature is checked before anything else is decoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasfile::raw::Header;
    /// let mut cursor = Cursor::new(Vec::new());
    /// Header::default().write_to(&mut cursor).unwrap();
    /// cursor.set_position(0);
    /// let header = Header::read_from(cursor).unwrap();
    /// ```
    pub fn read_from<R: Read>(mut read: R) -> Result<Header> {
        let mut buf = [0; COMMON_HEADER_SIZE];
        let n = utils::read_fully(&mut read, &mut buf)?;
        if n < LASF.len() || buf[..LASF.len()] != LASF {
            // Missing bytes stay zero.
            let mut signature = [0; 4];
            signature.copy_from_slice(&buf[..4]);
            return Err(Error::InvalidSignature(signature));
        }
        if n < COMMON_HEADER_SIZE {
            return Err(Error::TruncatedRecord {
                record: "header",
                expected: COMMON_HEADER_SIZE,
                actual: n,
            });
        }

        let mut cursor = Cursor::new(&buf[..]);
        let mut file_signature = [0; 4];
        cursor.read_exact(&mut file_signature)?;
        let file_source_id = cursor.read_u16::<LittleEndian>()?;
        let global_encoding = cursor.read_u16::<LittleEndian>()?;
        let mut guid = [0; 16];
        cursor.read_exact(&mut guid)?;
        let version_major = cursor.read_u8()?;
        let version_minor = cursor.read_u8()?;
        let version = Version::new(version_major, version_minor);
        let mut system_identifier = [0; 32];
        cursor.read_exact(&mut system_identifier)?;
        let mut generating_software = [0; 32];
        cursor.read_exact(&mut generating_software)?;
        let file_creation_day_of_year = cursor.read_u16::<LittleEndian>()?;
        let file_creation_year = cursor.read_u16::<LittleEndian>()?;
        let header_size = cursor.read_u16::<LittleEndian>()?;
        let offset_to_point_data = cursor.read_u32::<LittleEndian>()?;
        let number_of_variable_length_records = cursor.read_u32::<LittleEndian>()?;
        let point_data_record_format = cursor.read_u8()?;
        let point_data_record_length = cursor.read_u16::<LittleEndian>()?;
        let number_of_point_records = cursor.read_u32::<LittleEndian>()?;
        let mut number_of_points_by_return = [0; 5];
        for n in &mut number_of_points_by_return {
            *n = cursor.read_u32::<LittleEndian>()?;
        }
        let x_scale_factor = cursor.read_f64::<LittleEndian>()?;
        let y_scale_factor = cursor.read_f64::<LittleEndian>()?;
        let z_scale_factor = cursor.read_f64::<LittleEndian>()?;
        let x_offset = cursor.read_f64::<LittleEndian>()?;
        let y_offset = cursor.read_f64::<LittleEndian>()?;
        let z_offset = cursor.read_f64::<LittleEndian>()?;
        let max_x = cursor.read_f64::<LittleEndian>()?;
        let min_x = cursor.read_f64::<LittleEndian>()?;
        let max_y = cursor.read_f64::<LittleEndian>()?;
        let min_y = cursor.read_f64::<LittleEndian>()?;
        let max_z = cursor.read_f64::<LittleEndian>()?;
        let min_z = cursor.read_f64::<LittleEndian>()?;

        if !version.is_supported() {
            return Err(header::Error::Version(version).into());
        }
        if header_size < version.header_size() {
            return Err(header::Error::HeaderSize {
                version,
                header_size,
            }
            .into());
        }

        let mut extended = vec![0; usize::from(header_size) - COMMON_HEADER_SIZE];
        let n = utils::read_fully(&mut read, &mut extended)?;
        if n < extended.len() {
            return Err(Error::TruncatedRecord {
                record: "header",
                expected: usize::from(header_size),
                actual: COMMON_HEADER_SIZE + n,
            });
        }
        let mut cursor = Cursor::new(extended);
        let start_of_waveform_data_packet_record = if version.has_waveforms() {
            Some(cursor.read_u64::<LittleEndian>()?).filter(|&n| n != 0)
        } else {
            None
        };
        let evlr = if version.has_evlrs() {
            Evlr::read_from(&mut cursor)?.into_option()
        } else {
            None
        };
        let large_file = if version.has_large_files() {
            Some(LargeFile::read_from(&mut cursor)?)
        } else {
            None
        };
        let position = cursor.position() as usize;
        let padding = cursor.into_inner().split_off(position);

        Ok(Header {
            file_signature,
            file_source_id,
            global_encoding,
            guid,
            version,
            system_identifier,
            generating_software,
            file_creation_day_of_year,
            file_creation_year,
            header_size,
            offset_to_point_data,
            number_of_variable_length_records,
            point_data_record_format,
            point_data_record_length,
            number_of_point_records,
            number_of_points_by_return,
            x_scale_factor,
            y_scale_factor,
            z_scale_factor,
            x_offset,
            y_offset,
            z_offset,
            max_x,
            min_x,
            max_y,
            min_y,
            max_z,
            min_z,
            start_of_waveform_data_packet_record,
            evlr,
            large_file,
            padding,
        })
    }

    /// Writes a raw header to a `Write`.
    ///
    /// The same header always produces the same bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasfile::raw::Header;
    /// let mut cursor = Cursor::new(Vec::new());
    /// let header = Header::default();
    /// header.write_to(&mut cursor).unwrap();
    /// assert_eq!(227, cursor.into_inner().len());
    /// ```
    pub fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        write.write_all(&self.file_signature)?;
        write.write_u16::<LittleEndian>(self.file_source_id)?;
        write.write_u16::<LittleEndian>(self.global_encoding)?;
        write.write_all(&self.guid)?;
        write.write_u8(self.version.major)?;
        write.write_u8(self.version.minor)?;
        write.write_all(&self.system_identifier)?;
        write.write_all(&self.generating_software)?;
        write.write_u16::<LittleEndian>(self.file_creation_day_of_year)?;
        write.write_u16::<LittleEndian>(self.file_creation_year)?;
        write.write_u16::<LittleEndian>(self.header_size)?;
        write.write_u32::<LittleEndian>(self.offset_to_point_data)?;
        write.write_u32::<LittleEndian>(self.number_of_variable_length_records)?;
        write.write_u8(self.point_data_record_format)?;
        write.write_u16::<LittleEndian>(self.point_data_record_length)?;
        write.write_u32::<LittleEndian>(self.number_of_point_records)?;
        for n in &self.number_of_points_by_return {
            write.write_u32::<LittleEndian>(*n)?;
        }
        write.write_f64::<LittleEndian>(self.x_scale_factor)?;
        write.write_f64::<LittleEndian>(self.y_scale_factor)?;
        write.write_f64::<LittleEndian>(self.z_scale_factor)?;
        write.write_f64::<LittleEndian>(self.x_offset)?;
        write.write_f64::<LittleEndian>(self.y_offset)?;
        write.write_f64::<LittleEndian>(self.z_offset)?;
        write.write_f64::<LittleEndian>(self.max_x)?;
        write.write_f64::<LittleEndian>(self.min_x)?;
        write.write_f64::<LittleEndian>(self.max_y)?;
        write.write_f64::<LittleEndian>(self.min_y)?;
        write.write_f64::<LittleEndian>(self.max_z)?;
        write.write_f64::<LittleEndian>(self.min_z)?;
        if self.version.has_waveforms() {
            write.write_u64::<LittleEndian>(self.start_of_waveform_data_packet_record.unwrap_or(0))?;
        }
        if self.version.has_evlrs() {
            let evlr = self.evlr.unwrap_or_default();
            write.write_u64::<LittleEndian>(evlr.start_of_first_evlr)?;
            write.write_u32::<LittleEndian>(evlr.number_of_evlrs)?;
        }
        if self.version.has_large_files() {
            let large_file = self.large_file.unwrap_or_default();
            write.write_u64::<LittleEndian>(large_file.number_of_point_records)?;
            for n in &large_file.number_of_points_by_return {
                write.write_u64::<LittleEndian>(*n)?;
            }
        }
        write.write_all(&self.padding)?;
        Ok(())
    }
}

impl Default for Header {
    fn default() -> Header {
        let version = Version::new(1, 2);
        Header {
            file_signature: LASF,
            file_source_id: 0,
            global_encoding: 0,
            guid: [0; 16],
            version,
            system_identifier: [0; 32],
            generating_software: [0; 32],
            file_creation_day_of_year: 0,
            file_creation_year: 0,
            header_size: version.header_size(),
            offset_to_point_data: u32::from(version.header_size()),
            number_of_variable_length_records: 0,
            point_data_record_format: 0,
            point_data_record_length: 20,
            number_of_point_records: 0,
            number_of_points_by_return: [0; 5],
            x_scale_factor: 0.01,
            y_scale_factor: 0.01,
            z_scale_factor: 0.01,
            x_offset: 0.,
            y_offset: 0.,
            z_offset: 0.,
            max_x: 0.,
            min_x: 0.,
            max_y: 0.,
            min_y: 0.,
            max_z: 0.,
            min_z: 0.,
            start_of_waveform_data_packet_record: None,
            evlr: None,
            large_file: None,
            padding: Vec::new(),
        }
    }
}

impl Evlr {
    fn read_from<R: Read>(mut read: R) -> Result<Evlr> {
        Ok(Evlr {
            start_of_first_evlr: read.read_u64::<LittleEndian>()?,
            number_of_evlrs: read.read_u32::<LittleEndian>()?,
        })
    }

    fn into_option(self) -> Option<Evlr> {
        if self.start_of_first_evlr == 0 && self.number_of_evlrs == 0 {
            None
        } else {
            Some(self)
        }
    }
}

impl LargeFile {
    fn read_from<R: Read>(mut read: R) -> Result<LargeFile> {
        let number_of_point_records = read.read_u64::<LittleEndian>()?;
        let mut number_of_points_by_return = [0; 15];
        for n in &mut number_of_points_by_return {
            *n = read.read_u64::<LittleEndian>()?;
        }
        Ok(LargeFile {
            number_of_point_records,
            number_of_points_by_return,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(header: &Header) -> Vec<u8> {
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes
    }

    macro_rules! roundtrip {
        ($name:ident, $minor:expr) => {
            mod $name {
                #[test]
                fn roundtrip() {
                    use super::*;

                    let version = Version::new(1, $minor);
                    let mut header = Header {
                        version,
                        header_size: version.header_size(),
                        ..Default::default()
                    };
                    if version.has_large_files() {
                        header.large_file = Some(LargeFile::default());
                    }
                    let bytes = encode(&header);
                    assert_eq!(usize::from(version.header_size()), bytes.len());
                    assert_eq!(header, Header::read_from(&bytes[..]).unwrap());
                }
            }
        };
    }

    roundtrip!(las_1_0, 0);
    roundtrip!(las_1_1, 1);
    roundtrip!(las_1_2, 2);
    roundtrip!(las_1_3, 3);
    roundtrip!(las_1_4, 4);

    #[test]
    fn invalid_signature() {
        let mut bytes = encode(&Header::default());
        bytes[0] = b'X';
        assert!(matches!(
            Header::read_from(&bytes[..]),
            Err(Error::InvalidSignature(s)) if &s == b"XASF"
        ));
    }

    #[test]
    fn signature_checked_before_length() {
        assert!(matches!(
            Header::read_from(&b"PK\x03\x04 not a las file"[..]),
            Err(Error::InvalidSignature(_))
        ));
    }

    #[test]
    fn missing_signature() {
        assert!(matches!(
            Header::read_from(&b""[..]),
            Err(Error::InvalidSignature([0, 0, 0, 0]))
        ));
        assert!(matches!(
            Header::read_from(&b"XY"[..]),
            Err(Error::InvalidSignature(s)) if &s == b"XY\0\0"
        ));
        assert!(matches!(
            Header::read_from(&b"LAS"[..]),
            Err(Error::InvalidSignature(_))
        ));
    }

    #[test]
    fn truncated() {
        let bytes = encode(&Header::default());
        assert!(matches!(
            Header::read_from(&bytes[..100]),
            Err(Error::TruncatedRecord { actual: 100, .. })
        ));
    }

    #[test]
    fn header_size_too_small() {
        let header = Header {
            header_size: 200,
            ..Default::default()
        };
        assert!(matches!(
            Header::read_from(&encode(&header)[..]),
            Err(Error::MalformedHeader(header::Error::HeaderSize { .. }))
        ));
    }

    #[test]
    fn header_size_too_small_for_version() {
        let header = Header {
            version: Version::new(1, 4),
            header_size: 227,
            ..Default::default()
        };
        let mut bytes = encode(&header);
        bytes.truncate(227);
        assert!(matches!(
            Header::read_from(&bytes[..]),
            Err(Error::MalformedHeader(header::Error::HeaderSize { .. }))
        ));
    }

    #[test]
    fn unsupported_version() {
        let header = Header {
            version: Version::new(2, 0),
            ..Default::default()
        };
        assert!(matches!(
            Header::read_from(&encode(&header)[..]),
            Err(Error::MalformedHeader(header::Error::Version(_)))
        ));
    }

    #[test]
    fn padding() {
        let header = Header {
            header_size: 230,
            padding: vec![1, 2, 3],
            ..Default::default()
        };
        let bytes = encode(&header);
        assert_eq!(230, bytes.len());
        assert_eq!(header, Header::read_from(&bytes[..]).unwrap());
    }

    #[test]
    fn deterministic() {
        let header = Header {
            file_source_id: 42,
            number_of_point_records: 7,
            ..Default::default()
        };
        assert_eq!(encode(&header), encode(&header.clone()));
    }
}
