use crate::{Transform, file::Mode, header, point};
use std::path::PathBuf;
use thiserror::Error;

/// Crate-specific error enum.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The file signature was not "LASF".
    #[error("the file signature must be LASF, found {0:?}")]
    InvalidSignature([u8; 4]),

    /// The header describes a layout that cannot exist.
    #[error("malformed header: {0}")]
    MalformedHeader(#[from] header::Error),

    /// The stream ended partway through a record.
    #[error("truncated {record}: expected {expected} bytes, found {actual}")]
    TruncatedRecord {
        /// What kind of record was being read.
        record: &'static str,
        /// The number of bytes the record should have.
        expected: usize,
        /// The number of bytes that were available.
        actual: usize,
    },

    /// A declared length does not match the length of the data that goes with it.
    #[error("{what} declares {declared} bytes but has {actual}")]
    InconsistentLength {
        /// What has the mismatched length.
        what: &'static str,
        /// The declared length.
        declared: usize,
        /// The actual length.
        actual: usize,
    },

    /// The point carries a field that the active point format cannot store.
    #[error("point format {format} does not have a {field} field")]
    UnsupportedField {
        /// The point format id.
        format: u8,
        /// The field's name.
        field: &'static str,
    },

    /// The path is open for reading, so it cannot be opened for writing.
    #[error("{} is already open for read, close it first", .0.display())]
    AlreadyOpenForRead(PathBuf),

    /// The path is open for writing or appending, so it cannot be opened again.
    #[error("{} is already open for write, close it first", .0.display())]
    AlreadyOpenForWrite(PathBuf),

    /// The coordinate transform cannot be applied.
    #[error("invalid transform {0}: the scale must be finite and non-zero")]
    ConfigurationError(Transform),

    /// There is no point at this index in the stream.
    #[error("point index {index} is out of range, the stream holds {available} points")]
    IndexOutOfRange {
        /// The requested index.
        index: u64,
        /// The number of complete points actually in the stream.
        available: u64,
    },

    /// This point format id is not supported.
    #[error("point format {0} is not supported, only formats 0 through 3 are")]
    PointFormat(u8),

    /// The point's attributes can't be packed into a record.
    #[error(transparent)]
    Point(#[from] point::Error),

    /// The value can't be represented as a scaled i32.
    #[error("the transform {1} cannot store {0} as an i32")]
    InverseTransform(f64, Transform),

    /// This string is too long for its fixed-width field.
    #[error("the string {string:?} is longer than {capacity} bytes")]
    StringTooLong {
        /// The string.
        string: String,
        /// The width of the field.
        capacity: usize,
    },

    /// The session has been closed.
    #[error("the file session is closed")]
    Closed,

    /// The operation doesn't make sense in this session's mode.
    #[error("{operation} is not allowed for a session opened in {mode} mode")]
    WrongMode {
        /// The attempted operation.
        operation: &'static str,
        /// The session's mode.
        mode: Mode,
    },

    /// Wrapper around `std::io::Error`.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper around `std::str::Utf8Error`.
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    /// Wrapper around `uuid::Error`.
    #[error(transparent)]
    Guid(#[from] uuid::Error),
}
