//! Raw structures that map byte-for-byte onto the records of a las file.
//!
//! These structures do as little validity checking as they can get away with. For example, the
//! raw header keeps the point counts as they are on disk:
//!
//! ```
//! let raw_header = lasfile::raw::Header::default();
//! assert_eq!(0, raw_header.number_of_point_records);
//!
//! let header = lasfile::Header::default();
//! assert_eq!(lasfile::Version::new(1, 2), header.version);
//! ```
//!
//! Prefer the non-raw versions, e.g. `lasfile::Header` over `lasfile::raw::Header`, unless you
//! need to see exactly what is in the file.

pub mod header;
pub mod point;
pub mod vlr;

pub use self::header::{Evlr, Header, LargeFile};
pub use self::point::Point;
pub use self::vlr::Vlr;

/// The file magic number used for all las files.
pub const LASF: [u8; 4] = *b"LASF";

/// The two bytes that las 1.0 expects right before the point data.
pub const POINT_DATA_START_SIGNATURE: [u8; 2] = [0xDD, 0xCC];
