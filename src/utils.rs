use crate::{Error, Result};
use std::{
    io::{ErrorKind, Read},
    str,
};

/// Reads into `buf` until it is full or the stream ends, returning the number of bytes read.
///
/// Unlike `read_exact`, a short read is not an error, so callers can tell a clean end of stream
/// (zero bytes) from a truncated record.
pub(crate) fn read_fully<R: Read>(mut read: R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match read.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Fills `buf` with one record.
///
/// Returns `Ok(false)` if the stream was already at its end, and `TruncatedRecord` if it ended
/// partway through.
pub(crate) fn read_record<R: Read>(read: R, buf: &mut [u8], record: &'static str) -> Result<bool> {
    let n = read_fully(read, buf)?;
    if n == buf.len() {
        Ok(true)
    } else if n == 0 {
        Ok(false)
    } else {
        Err(Error::TruncatedRecord {
            record,
            expected: buf.len(),
            actual: n,
        })
    }
}

/// Reads fixed-width las byte fields as strings.
pub(crate) trait AsLasStr {
    /// Interprets the bytes up to the first nul as a `&str`.
    ///
    /// Anything after the first nul is ignored, even if it isn't nul.
    fn as_las_str(&self) -> Result<&str>;
}

impl AsLasStr for [u8] {
    fn as_las_str(&self) -> Result<&str> {
        let end = self.iter().position(|&n| n == 0).unwrap_or(self.len());
        str::from_utf8(&self[..end]).map_err(Error::from)
    }
}

/// Writes strings into fixed-width, nul-filled las byte fields.
pub(crate) trait FromLasStr {
    /// Fills `self` with the bytes of `s` followed by nuls.
    ///
    /// Errors if `s` doesn't fit.
    fn from_las_str(&mut self, s: &str) -> Result<()>;
}

impl<T: AsMut<[u8]>> FromLasStr for T {
    fn from_las_str(&mut self, s: &str) -> Result<()> {
        let buf = self.as_mut();
        if s.len() > buf.len() {
            return Err(Error::StringTooLong {
                string: s.to_string(),
                capacity: buf.len(),
            });
        }
        buf.fill(0);
        buf[..s.len()].copy_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Truncates a string to at most `max` bytes without splitting a character.
pub(crate) fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
