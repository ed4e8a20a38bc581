//! File sessions tie a path, a mode, and a `Registry` together.
//!
//! A session is opened for reading, writing, or appending, and stays in that mode until it is
//! closed:
//!
//! ```no_run
//! use lasfile::{File, Header, Point, Registry};
//!
//! let registry = Registry::new();
//! let mut file = File::open_write(&registry, "points.las", Some(Header::default())).unwrap();
//! file.write(Point { x: 1., y: 2., z: 3., ..Default::default() }).unwrap();
//! file.close().unwrap();
//!
//! let mut file = File::open_read(&registry, "points.las").unwrap();
//! for point in file.points().unwrap() {
//!     println!("{:?}", point.unwrap());
//! }
//! ```
//!
//! # Restarting iteration
//!
//! When iteration runs off the end of the points, the session reopens its file and moves back to
//! the first point. The session keeps its claim on the path while it does this. So iterating a
//! read session twice yields the same points twice, and a partially consumed iteration picks up
//! where it left off.

use crate::{Error, Header, Point, Reader, Registry, Result, Srs, Writer, registry};
use log::{debug, warn};
use std::{
    fmt,
    fs::{self, OpenOptions},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

/// The mode a session is opened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Read points.
    Read,
    /// Write a new file, replacing anything that's there.
    Write,
    /// Write points after the ones already in a file.
    Append,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Read => f.write_str("read"),
            Mode::Write => f.write_str("write"),
            Mode::Append => f.write_str("append"),
        }
    }
}

#[derive(Debug)]
enum State {
    Closed,
    Reading(Reader<BufReader<fs::File>>),
    Writing(Writer<BufWriter<fs::File>>),
}

/// A las file on disk, open in one mode.
///
/// Dropping a session closes it, but errors from that close are only logged. Call `close` to see
/// them.
#[derive(Debug)]
pub struct File {
    registry: Registry,
    path: PathBuf,
    mode: Mode,
    state: State,
}

impl File {
    /// Opens a session.
    ///
    /// The path is claimed in the registry before the file is touched, so a conflicting claim
    /// fails with nothing opened or created.
    ///
    /// - In read mode, `header` is ignored and the header is read from the file.
    /// - In write mode, `header` is written right away, or a default header if there isn't one.
    /// - In append mode without a header, the file is briefly opened for reading to recover its
    ///   header. A header that is given is trusted to describe the file.
    pub fn open<P: AsRef<Path>>(
        registry: &Registry,
        path: P,
        mode: Mode,
        header: Option<Header>,
    ) -> Result<File> {
        let path = registry::resolve(path.as_ref())?;
        let header = match (mode, header) {
            (Mode::Append, None) => {
                let mut file = File::open(registry, &path, Mode::Read, None)?;
                let header = file.header()?.clone();
                file.close()?;
                Some(header)
            }
            (_, header) => header,
        };

        registry.register(&path, mode)?;
        match open_state(&path, mode, header) {
            Ok(state) => {
                debug!("opened {} for {mode}", path.display());
                Ok(File {
                    registry: registry.clone(),
                    path,
                    mode,
                    state,
                })
            }
            Err(err) => {
                registry.release(&path, mode);
                Err(err)
            }
        }
    }

    /// Opens a session for reading.
    pub fn open_read<P: AsRef<Path>>(registry: &Registry, path: P) -> Result<File> {
        File::open(registry, path, Mode::Read, None)
    }

    /// Opens a session for writing, with a default header if none is given.
    pub fn open_write<P: AsRef<Path>>(
        registry: &Registry,
        path: P,
        header: Option<Header>,
    ) -> Result<File> {
        File::open(registry, path, Mode::Write, header)
    }

    /// Opens a session for appending, recovering the header from the file if none is given.
    pub fn open_append<P: AsRef<Path>>(
        registry: &Registry,
        path: P,
        header: Option<Header>,
    ) -> Result<File> {
        File::open(registry, path, Mode::Append, header)
    }

    /// Closes this session and gives up its claim on the path.
    ///
    /// Writers rewrite their header first. The claim is given up even if that fails. Closing a
    /// closed session does nothing.
    pub fn close(&mut self) -> Result<()> {
        let result = match std::mem::replace(&mut self.state, State::Closed) {
            State::Closed => return Ok(()),
            State::Reading(_) => Ok(()),
            State::Writing(mut writer) => writer.close(),
        };
        self.registry.release(&self.path, self.mode);
        debug!("closed {}", self.path.display());
        result
    }

    /// Returns true if this session hasn't been closed.
    pub fn is_open(&self) -> bool {
        !matches!(self.state, State::Closed)
    }

    /// Returns the absolute path of this session.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the mode of this session.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the header.
    pub fn header(&self) -> Result<&Header> {
        match &self.state {
            State::Closed => Err(Error::Closed),
            State::Reading(reader) => Ok(reader.header()),
            State::Writing(writer) => Ok(writer.header()),
        }
    }

    /// Returns the header for changes, only when writing or appending.
    ///
    /// Changes are written when the session closes.
    pub fn header_mut(&mut self) -> Result<&mut Header> {
        let mode = self.mode;
        match &mut self.state {
            State::Closed => Err(Error::Closed),
            State::Reading(_) => Err(Error::WrongMode {
                operation: "header_mut",
                mode,
            }),
            State::Writing(writer) => Ok(writer.header_mut()),
        }
    }

    /// Returns the spatial reference system in the header, if any.
    pub fn srs(&self) -> Result<Option<Srs>> {
        self.header().map(Header::srs)
    }

    /// Returns the number of points that the header declares.
    pub fn len(&self) -> Result<u64> {
        self.header().map(|header| header.number_of_points)
    }

    /// Returns true if the header declares no points.
    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }

    /// Reads the point at `index`, without disturbing iteration.
    ///
    /// An index past the last point that is actually in the file is `IndexOutOfRange`, even if
    /// the header claims more points.
    pub fn read(&mut self, index: u64) -> Result<Point> {
        self.reader("read")?.read_at(index)
    }

    /// Returns an iterator over the points, starting at the current position.
    ///
    /// See the module documentation for what happens at the end.
    pub fn points(&mut self) -> Result<Points<'_>> {
        let reader = self.reader("points")?;
        let from_start = reader.index()? == 0;
        Ok(Points {
            file: self,
            count: 0,
            from_start,
            done: false,
        })
    }

    /// Writes a point at the end of the file.
    ///
    /// Nothing is counted, so use `header_mut` or `summarize` to keep the header current.
    pub fn write(&mut self, point: Point) -> Result<()> {
        let mode = self.mode;
        match &mut self.state {
            State::Closed => Err(Error::Closed),
            State::Reading(_) => Err(Error::WrongMode {
                operation: "write",
                mode,
            }),
            State::Writing(writer) => writer.write_point(point),
        }
    }

    /// Recomputes the point count, return histogram, and bounds by scanning every point.
    ///
    /// Returns the updated header. When writing or appending, the session's header is updated
    /// too, and the summary is written on close.
    pub fn summarize(&mut self) -> Result<Header> {
        if let State::Writing(writer) = &mut self.state {
            writer.flush()?;
        }
        let mut header = self.header()?.clone();
        header.clear_summary();
        let mut reader = Reader::from_path(&self.path)?;
        for point in reader.points() {
            header.add_point(&point?);
        }
        if let State::Writing(writer) = &mut self.state {
            let summarized = writer.header_mut();
            summarized.number_of_points = header.number_of_points;
            summarized.set_number_of_points_by_return(&header.number_of_points_by_return())?;
            summarized.bounds = header.bounds;
        }
        Ok(header)
    }

    fn reader(&mut self, operation: &'static str) -> Result<&mut Reader<BufReader<fs::File>>> {
        match &mut self.state {
            State::Closed => Err(Error::Closed),
            State::Reading(reader) => Ok(reader),
            State::Writing(_) => Err(Error::WrongMode {
                operation,
                mode: self.mode,
            }),
        }
    }

    fn reopen(&mut self) -> Result<()> {
        debug!("reopening {} at its first point", self.path.display());
        self.state = State::Reading(Reader::from_path(&self.path)?);
        Ok(())
    }
}

impl Drop for File {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("error while closing {}: {err}", self.path.display());
        }
    }
}

fn open_state(path: &Path, mode: Mode, header: Option<Header>) -> Result<State> {
    match mode {
        Mode::Read => Reader::from_path(path).map(State::Reading),
        Mode::Write => Writer::from_path(path, header.unwrap_or_default()).map(State::Writing),
        Mode::Append => {
            let header = header.unwrap_or_default();
            let file = OpenOptions::new().read(true).write(true).open(path)?;
            Writer::append(BufWriter::new(file), header).map(State::Writing)
        }
    }
}

/// An iterator over the points of a read session.
///
/// When the points run out, the session is reopened at its first point and the iterator ends.
/// The iterator also ends after an error, without reopening.
#[derive(Debug)]
pub struct Points<'a> {
    file: &'a mut File,
    count: u64,
    from_start: bool,
    done: bool,
}

impl Iterator for Points<'_> {
    type Item = Result<Point>;

    fn next(&mut self) -> Option<Result<Point>> {
        if self.done {
            return None;
        }
        let result = match self.file.reader("points") {
            Ok(reader) => reader.read_point(),
            Err(err) => Err(err),
        };
        match result {
            Ok(Some(point)) => {
                self.count += 1;
                Some(Ok(point))
            }
            Ok(None) => {
                self.done = true;
                if let Ok(header) = self.file.header() {
                    if self.from_start && header.number_of_points != self.count {
                        warn!(
                            "{} declares {} points but holds {}",
                            self.file.path.display(),
                            header.number_of_points,
                            self.count
                        );
                    }
                }
                self.file.reopen().err().map(Err)
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
