//! Write las points.
//!
//! A `Writer` writes its header as soon as it is created, and then one point record for each call
//! to `write_point`:
//!
//! ```
//! use std::io::Cursor;
//! use lasfile::{Header, Point, Writer};
//! let mut writer = Writer::new(Cursor::new(Vec::new()), Header::default()).unwrap();
//! writer.write_point(Point { x: 1., y: 2., z: 3., ..Default::default() }).unwrap();
//! writer.close().unwrap();
//! ```
//!
//! The writer doesn't count points or track bounds. Update the header through `header_mut`
//! before closing, and the header is rewritten in place when the writer closes.

use crate::{Error, Header, Point, Result, header};
use log::debug;
use std::{
    fs::File,
    io::{BufWriter, Seek, SeekFrom, Write},
    path::Path,
};

/// Writes las data.
///
/// Nothing is rewritten on drop, so call `close` or `into_inner` when done.
#[derive(Debug)]
pub struct Writer<W: Write + Seek> {
    write: W,
    header: Header,
    start: u64,
    layout: (crate::point::Format, u64),
    closed: bool,
}

impl Writer<BufWriter<File>> {
    /// Creates a new writer for a path, truncating anything that is already there.
    ///
    /// The header is encoded before the file is created, so a header that can't be written
    /// leaves an existing file untouched.
    pub fn from_path<P: AsRef<Path>>(path: P, header: Header) -> Result<Writer<BufWriter<File>>> {
        let bytes = header.to_bytes()?;
        let file = File::create(path)?;
        Writer::start(BufWriter::new(file), header, &bytes)
    }
}

impl<W: Write + Seek> Writer<W> {
    /// Creates a new writer and writes the header.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasfile::Writer;
    /// let writer = Writer::new(Cursor::new(Vec::new()), Default::default()).unwrap();
    /// let cursor = writer.into_inner().unwrap();
    /// assert_eq!(227, cursor.into_inner().len());
    /// ```
    pub fn new(write: W, header: Header) -> Result<Writer<W>> {
        let bytes = header.to_bytes()?;
        Writer::start(write, header, &bytes)
    }

    fn start(mut write: W, header: Header, bytes: &[u8]) -> Result<Writer<W>> {
        let start = write.stream_position()?;
        write.write_all(bytes)?;
        Ok(Writer {
            layout: header.layout(),
            write,
            header,
            start,
            closed: false,
        })
    }

    /// Creates a writer that adds points to the end of existing las data.
    ///
    /// The las data must start at the current position of `write`, and `header` must describe
    /// it. Nothing is written until the first point.
    pub fn append(mut write: W, header: Header) -> Result<Writer<W>> {
        let start = write.stream_position()?;
        let end = write.seek(SeekFrom::End(0))?;
        if end < start + header.offset_to_point_data() {
            return Err(Error::TruncatedRecord {
                record: "header",
                expected: header.offset_to_point_data() as usize,
                actual: (end - start) as usize,
            });
        }
        debug!("appending after {} bytes of las data", end - start);
        Ok(Writer {
            layout: header.layout(),
            write,
            header,
            start,
            closed: false,
        })
    }

    /// Returns a reference to this writer's header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns a mutable reference to this writer's header, e.g. to update its summary.
    ///
    /// The point format, record length, and vlrs can't change size, since points have
    /// already been laid out behind them.
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Writes a point.
    ///
    /// A point that can't be encoded is an error, and nothing is written for it.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasfile::{Point, Writer};
    /// let mut writer = Writer::new(Cursor::new(Vec::new()), Default::default()).unwrap();
    /// let point = Point { gps_time: Some(1.), ..Default::default() };
    /// assert!(writer.write_point(point).is_err());
    /// ```
    pub fn write_point(&mut self, point: Point) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        let raw_point = point.into_raw(&self.header.transforms)?;
        raw_point.write_to(&mut self.write, self.header.point_format)
    }

    /// Writes many points, stopping at the first one that can't be written.
    pub fn write_points<I: IntoIterator<Item = Point>>(&mut self, points: I) -> Result<()> {
        for point in points {
            self.write_point(point)?;
        }
        Ok(())
    }

    /// Flushes the points written so far, without rewriting the header.
    pub fn flush(&mut self) -> Result<()> {
        self.write.flush().map_err(Error::from)
    }

    /// Rewrites the header and flushes.
    ///
    /// Closing twice is fine, and the second close does nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasfile::Writer;
    /// let mut writer = Writer::new(Cursor::new(Vec::new()), Default::default()).unwrap();
    /// writer.header_mut().number_of_points = 1;
    /// writer.close().unwrap();
    /// writer.close().unwrap();
    /// assert!(writer.write_point(Default::default()).is_err());
    /// ```
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if self.header.layout() != self.layout {
            return Err(header::Error::LayoutChanged.into());
        }
        let bytes = self.header.to_bytes()?;
        let end = self.write.stream_position()?;
        let _ = self.write.seek(SeekFrom::Start(self.start))?;
        self.write.write_all(&bytes)?;
        let _ = self.write.seek(SeekFrom::Start(end))?;
        self.write.flush()?;
        self.closed = true;
        Ok(())
    }

    /// Closes this writer and returns its inner `Write`, seeked to the beginning of the las data.
    pub fn into_inner(mut self) -> Result<W> {
        self.close()?;
        let _ = self.write.seek(SeekFrom::Start(self.start))?;
        Ok(self.write)
    }
}
