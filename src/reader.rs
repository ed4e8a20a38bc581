//! Read las points.
//!
//! A `Reader` works on anything that is `Read + Seek`. If you're reading any significant number of
//! points, make sure that's a `BufRead`. `Reader::from_path` does this for you:
//!
//! ```no_run
//! use lasfile::Reader;
//! let mut reader = Reader::from_path("points.las").unwrap();
//! let first_point = reader.read_point().unwrap().unwrap();
//! let the_rest = reader.points().map(|r| r.unwrap()).collect::<Vec<_>>();
//! ```
//!
//! Points are read until the stream runs out, whatever the header says the point count is.

use crate::{Error, Header, Point, Result, raw, utils};
use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
};

/// Reads las data.
#[derive(Debug)]
pub struct Reader<R> {
    read: R,
    header: Header,
    start: u64,
    buf: Vec<u8>,
}

impl Reader<BufReader<File>> {
    /// Creates a new reader for a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Reader<BufReader<File>>> {
        File::open(path)
            .map_err(Error::from)
            .and_then(|file| Reader::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Creates a new reader.
    ///
    /// The header and vlrs are read right away, which leaves the reader at the first point.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasfile::{Header, Reader};
    /// let mut bytes = Vec::new();
    /// Header::default().write_to(&mut bytes).unwrap();
    /// let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
    /// assert!(reader.read_point().unwrap().is_none());
    /// ```
    pub fn new(mut read: R) -> Result<Reader<R>> {
        let start = read.stream_position()?;
        let header = Header::read_from(&mut read)?;
        let start = start + header.offset_to_point_data();
        let _ = read.seek(SeekFrom::Start(start))?;
        let buf = vec![0; usize::from(header.point_format.len())];
        Ok(Reader {
            read,
            header,
            start,
            buf,
        })
    }

    /// Returns a reference to this reader's header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Reads the next point, or returns `None` at the end of the stream.
    ///
    /// A stream that ends partway through a record is a `TruncatedRecord` error.
    pub fn read_point(&mut self) -> Result<Option<Point>> {
        if !utils::read_record(&mut self.read, &mut self.buf, "point")? {
            return Ok(None);
        }
        let raw_point = raw::Point::read_from(&self.buf[..], self.header.point_format)?;
        Ok(Some(Point::new(raw_point, &self.header.transforms)))
    }

    /// Reads up to `n` points.
    pub fn read_points(&mut self, n: u64) -> Result<Vec<Point>> {
        let mut points = Vec::new();
        for _ in 0..n {
            match self.read_point()? {
                Some(point) => points.push(point),
                None => break,
            }
        }
        Ok(points)
    }

    /// Reads all remaining points.
    pub fn read_all_points(&mut self) -> Result<Vec<Point>> {
        self.points().collect()
    }

    /// Reads the point at `index` without moving the reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasfile::{Header, Reader};
    /// let mut header = Header::default();
    /// header.number_of_points = 10; // lies
    /// let mut bytes = Vec::new();
    /// header.write_to(&mut bytes).unwrap();
    /// let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
    /// assert!(reader.read_at(0).is_err());
    /// ```
    pub fn read_at(&mut self, index: u64) -> Result<Point> {
        let position = self.read.stream_position()?;
        let result = self.seek(index).and_then(|()| self.read_point());
        let _ = self.read.seek(SeekFrom::Start(position))?;
        match result? {
            Some(point) => Ok(point),
            None => Err(Error::IndexOutOfRange {
                index,
                available: self.available_points()?,
            }),
        }
    }

    /// Moves the reader to the point at `index`.
    ///
    /// Seeking past the end is allowed, and the next read returns `None`.
    pub fn seek(&mut self, index: u64) -> Result<()> {
        let offset = index
            .checked_mul(u64::from(self.header.point_format.len()))
            .and_then(|n| n.checked_add(self.start));
        match offset {
            Some(offset) => {
                let _ = self.read.seek(SeekFrom::Start(offset))?;
                Ok(())
            }
            None => Err(Error::IndexOutOfRange {
                index,
                available: self.available_points()?,
            }),
        }
    }

    /// Moves the reader back to the first point.
    pub fn rewind(&mut self) -> Result<()> {
        self.seek(0)
    }

    /// Returns the index of the next point to be read.
    pub fn index(&mut self) -> Result<u64> {
        let position = self.read.stream_position()?;
        Ok(position.saturating_sub(self.start) / u64::from(self.header.point_format.len()))
    }

    /// Returns the number of whole point records that are actually in the stream.
    ///
    /// This can differ from the header's point count.
    pub fn available_points(&mut self) -> Result<u64> {
        let position = self.read.stream_position()?;
        let end = self.read.seek(SeekFrom::End(0))?;
        let _ = self.read.seek(SeekFrom::Start(position))?;
        Ok(end.saturating_sub(self.start) / u64::from(self.header.point_format.len()))
    }

    /// Returns an iterator over this reader's remaining points.
    ///
    /// The iterator stops after the first error.
    pub fn points(&mut self) -> Points<'_, R> {
        Points {
            reader: self,
            done: false,
        }
    }

    /// Consumes this reader, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.read
    }
}

/// An iterator over the points of a reader.
#[derive(Debug)]
pub struct Points<'a, R> {
    reader: &'a mut Reader<R>,
    done: bool,
}

impl<R: Read + Seek> Iterator for Points<'_, R> {
    type Item = Result<Point>;

    fn next(&mut self) -> Option<Result<Point>> {
        if self.done {
            return None;
        }
        let result = self.reader.read_point().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Writer;
    use std::io::Cursor;

    fn las(n: usize) -> Vec<u8> {
        let mut writer = Writer::new(Cursor::new(Vec::new()), Header::default()).unwrap();
        for i in 0..n {
            writer
                .write_point(Point {
                    x: i as f64,
                    ..Default::default()
                })
                .unwrap();
        }
        writer.into_inner().unwrap().into_inner()
    }

    #[test]
    fn reads_to_end_of_stream() {
        let mut reader = Reader::new(Cursor::new(las(3))).unwrap();
        assert_eq!(3, reader.read_all_points().unwrap().len());
        assert!(reader.read_point().unwrap().is_none());
    }

    #[test]
    fn truncated_point() {
        let mut bytes = las(2);
        let _ = bytes.pop();
        let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
        let points: Vec<_> = reader.points().collect();
        assert_eq!(2, points.len());
        assert!(points[0].is_ok());
        assert!(matches!(points[1], Err(Error::TruncatedRecord { .. })));
    }

    #[test]
    fn read_at_keeps_position() {
        let mut reader = Reader::new(Cursor::new(las(3))).unwrap();
        assert_eq!(0., reader.read_point().unwrap().unwrap().x);
        assert_eq!(2., reader.read_at(2).unwrap().x);
        assert_eq!(1., reader.read_point().unwrap().unwrap().x);
    }

    #[test]
    fn read_at_out_of_range() {
        let mut reader = Reader::new(Cursor::new(las(3))).unwrap();
        assert!(matches!(
            reader.read_at(3),
            Err(Error::IndexOutOfRange {
                index: 3,
                available: 3
            })
        ));
        assert!(matches!(
            reader.read_at(u64::MAX),
            Err(Error::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn seek_and_rewind() {
        let mut reader = Reader::new(Cursor::new(las(3))).unwrap();
        reader.seek(1).unwrap();
        assert_eq!(2, reader.read_points(5).unwrap().len());
        reader.rewind().unwrap();
        assert_eq!(3, reader.read_points(5).unwrap().len());
    }

    #[test]
    fn invalid_signature() {
        let mut bytes = las(0);
        bytes[0] = b'X';
        assert!(matches!(
            Reader::new(Cursor::new(bytes)),
            Err(Error::InvalidSignature(_))
        ));
    }
}
