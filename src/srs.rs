//! Spatial reference systems, carried as an opaque tag.
//!
//! A las file stores its spatial reference system in `LASF_Projection` vlrs, either as
//! [WKT](https://en.wikipedia.org/wiki/Well-known_text_representation_of_coordinate_reference_systems)
//! or as GeoTIFF keys. This crate doesn't interpret or reproject anything, it just keeps those
//! records together so they can be handed to something that does:
//!
//! ```
//! use lasfile::{Header, Srs};
//! let mut header = Header::default();
//! header.set_srs(Srs::from_wkt("GEOGCS[\"WGS 84\"]").unwrap());
//! assert_eq!(Some("GEOGCS[\"WGS 84\"]"), header.srs().unwrap().wkt());
//! ```

use crate::{Result, Vlr, vlr::PROJECTION_USER_ID};
use log::warn;

/// The record id of a WKT coordinate system vlr.
pub const WKT_RECORD_ID: u16 = 2112;

/// The record id of the GeoTIFF key directory vlr.
pub const GEO_KEY_DIRECTORY_RECORD_ID: u16 = 34735;

/// An opaque spatial reference system, made of one or more projection vlrs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Srs {
    vlrs: Vec<Vlr>,
}

impl Srs {
    /// Collects the projection vlrs out of a sequence of vlrs.
    ///
    /// Returns `None` if there aren't any.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::{Srs, Vlr};
    /// assert!(Srs::from_vlrs(vec![Vlr::default()]).is_none());
    /// ```
    pub fn from_vlrs<I: IntoIterator<Item = Vlr>>(vlrs: I) -> Option<Srs> {
        let vlrs: Vec<Vlr> = vlrs.into_iter().filter(Vlr::is_projection).collect();
        if vlrs.is_empty() {
            None
        } else {
            Some(Srs { vlrs })
        }
    }

    /// Creates a spatial reference system from a WKT string.
    ///
    /// The string is stored nul-terminated, as other las software expects.
    pub fn from_wkt(wkt: &str) -> Result<Srs> {
        let mut data = Vec::with_capacity(wkt.len() + 1);
        data.extend_from_slice(wkt.as_bytes());
        data.push(0);
        let vlr = Vlr::from_data(
            PROJECTION_USER_ID,
            WKT_RECORD_ID,
            "OGC coordinate system WKT",
            data,
        )?;
        Ok(Srs { vlrs: vec![vlr] })
    }

    /// Returns the WKT string, if this system has a WKT record.
    ///
    /// Returns `None` for a WKT record that isn't valid UTF-8.
    pub fn wkt(&self) -> Option<&str> {
        let vlr = self
            .vlrs
            .iter()
            .find(|vlr| vlr.record_id == WKT_RECORD_ID)?;
        let end = vlr
            .data
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(vlr.data.len());
        match std::str::from_utf8(&vlr.data[..end]) {
            Ok(wkt) => Some(wkt),
            Err(err) => {
                warn!("wkt projection record is not valid utf-8: {err}");
                None
            }
        }
    }

    /// Returns true if this system has GeoTIFF keys.
    pub fn has_geotiff_keys(&self) -> bool {
        self.vlrs
            .iter()
            .any(|vlr| vlr.record_id == GEO_KEY_DIRECTORY_RECORD_ID)
    }

    /// Returns the projection vlrs.
    pub fn vlrs(&self) -> &[Vlr] {
        &self.vlrs
    }

    /// Consumes this system, returning its vlrs.
    pub fn into_vlrs(self) -> Vec<Vlr> {
        self.vlrs
    }
}
