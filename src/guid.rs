use crate::{Error, Result};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// A 128-bit globally unique identifier, used as a las project id.
///
/// Las stores the guid as four fields: a u32, two u16s, and eight bytes, with the integers in
/// little-endian order. `from_bytes` and `to_bytes` convert from and to that layout, while the
/// canonical string form is the usual `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
///
/// Equality is bitwise.
///
/// ```
/// use lasfile::Guid;
/// let guid: Guid = "8388f1b1-aa1b-4108-bca3-6bc68e7b062e".parse().unwrap();
/// assert_eq!("8388f1b1-aa1b-4108-bca3-6bc68e7b062e", guid.to_string());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Guid(Uuid);

impl Guid {
    /// Returns the all-zeros guid, which las treats as "not assigned".
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Guid;
    /// assert!(Guid::nil().is_nil());
    /// ```
    pub fn nil() -> Guid {
        Guid(Uuid::nil())
    }

    /// Creates a new random guid.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Guid;
    /// assert_ne!(Guid::new_random(), Guid::new_random());
    /// ```
    pub fn new_random() -> Guid {
        Guid(Uuid::new_v4())
    }

    /// Creates a guid from its sixteen on-disk bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Guid {
        Guid(Uuid::from_bytes_le(bytes))
    }

    /// Returns the sixteen bytes that are written to disk.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Guid;
    /// let guid = Guid::new_random();
    /// assert_eq!(guid, Guid::from_bytes(guid.to_bytes()));
    /// ```
    pub fn to_bytes(&self) -> [u8; 16] {
        self.0.to_bytes_le()
    }

    /// Returns true if this is the nil guid.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl FromStr for Guid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Guid> {
        Uuid::parse_str(s).map(Guid).map_err(Error::from)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for Guid {
    fn from(uuid: Uuid) -> Guid {
        Guid(uuid)
    }
}

impl From<Guid> for Uuid {
    fn from(guid: Guid) -> Uuid {
        guid.0
    }
}
