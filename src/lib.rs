//! Read, write, and append to [ASPRS LAS](https://www.asprs.org/divisions-committees/lidar-division/laser-las-file-format-exchange-activities)
//! point cloud files.
//!
//! # Sessions
//!
//! Most of the time you'll work through a `File`, which opens a path in one mode and claims it in
//! a `Registry` so that other sessions can't write to it underneath you:
//!
//! ```no_run
//! use lasfile::{File, Mode, Registry};
//! let registry = Registry::new();
//! let mut file = File::open(&registry, "points.las", Mode::Read, None).unwrap();
//! println!("{} points", file.len().unwrap());
//! let point = file.read(0).unwrap();
//! ```
//!
//! # Reading
//!
//! A `Reader` works on anything that is `Read + Seek`:
//!
//! ```
//! use std::io::Cursor;
//! use lasfile::{Header, Reader};
//! let mut bytes = Vec::new();
//! Header::default().write_to(&mut bytes).unwrap();
//! let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
//! for point in reader.points() {
//!     let point = point.unwrap();
//!     println!("({}, {}, {})", point.x, point.y, point.z);
//! }
//! ```
//!
//! ## Prefer `BufRead`
//!
//! Your performance will be better if your `Read` is actually a `BufRead`. `Reader::from_path`
//! takes care of this for you, but `Reader::new` doesn't.
//!
//! # Writing
//!
//! Create a `Writer` from a `Write + Seek` and a `Header`. Use a `Builder` to customize the
//! header:
//!
//! ```
//! use std::io::Cursor;
//! use lasfile::{Builder, Point, Writer};
//! use lasfile::point::Format;
//!
//! let mut builder = Builder::default();
//! builder.point_format = Format::new(1).unwrap();
//! let header = builder.into_header().unwrap();
//!
//! let mut writer = Writer::new(Cursor::new(Vec::new()), header).unwrap();
//! let point = Point { x: 1., y: 2., z: 3., gps_time: Some(4.), ..Default::default() };
//! writer.header_mut().add_point(&point);
//! writer.write_point(point).unwrap();
//! writer.close().unwrap();
//! ```
//!
//! ## Prefer `BufWrite`
//!
//! Just like the `Reader`, your performance will improve greatly if you use a `BufWriter` instead
//! of just a `Write`.

#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

pub mod file;
pub mod header;
pub mod point;
pub mod raw;
pub mod reader;
pub mod registry;
pub mod srs;
pub mod vlr;
pub mod writer;

mod bounds;
mod color;
mod error;
mod gps_time_type;
mod guid;
mod transform;
mod utils;
mod vector;
mod version;

pub use crate::{
    bounds::Bounds,
    color::Color,
    error::Error,
    file::{File, Mode},
    gps_time_type::GpsTimeType,
    guid::Guid,
    header::{Builder, Header},
    point::Point,
    reader::Reader,
    registry::Registry,
    srs::Srs,
    transform::Transform,
    vector::Vector,
    version::Version,
    vlr::Vlr,
    writer::Writer,
};

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;
