use super::Error;
use crate::{
    GpsTimeType, Guid, Header, Result, Transform, Vector, Version, Vlr, point::Format,
    raw::POINT_DATA_START_SIGNATURE,
};
use chrono::NaiveDate;

/// Builds headers, checking that the settings make sense together.
///
/// # Examples
///
/// ```
/// use lasfile::header::Builder;
/// use lasfile::point::Format;
/// let mut builder = Builder::default();
/// builder.point_format = Format::new(1).unwrap();
/// let header = builder.into_header().unwrap();
/// assert_eq!(28, header.point_format.len());
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    /// The date of file creation, if any.
    pub date: Option<NaiveDate>,

    /// The file source id, sometimes the flight line.
    pub file_source_id: u16,

    /// The software that created this file.
    pub generating_software: String,

    /// The type of gps time, either week or standard.
    pub gps_time_type: GpsTimeType,

    /// A globally unique identifier.
    pub guid: Guid,

    /// Bytes after the standard header fields.
    pub padding: Vec<u8>,

    /// The format that the points will be written in.
    pub point_format: Format,

    /// The system that generated the points.
    pub system_identifier: String,

    /// The scale and offset that will be used to convert coordinates to `i32`s.
    pub transforms: Vector<Transform>,

    /// The las version.
    pub version: Version,

    /// The bytes after the vlrs but before the points.
    pub vlr_padding: Vec<u8>,

    /// The variable length records.
    pub vlrs: Vec<Vlr>,

    template: Header,
}

impl Builder {
    /// Converts this builder into a `Header`.
    ///
    /// Las 1.0 files get the point data start signature appended to their vlr padding if it isn't
    /// already there.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::header::Builder;
    /// use lasfile::Version;
    /// let mut builder = Builder::default();
    /// builder.version = Version::new(1, 0);
    /// let header = builder.into_header().unwrap();
    /// assert_eq!(vec![0xDD, 0xCC], header.vlr_padding);
    /// ```
    pub fn into_header(mut self) -> Result<Header> {
        let version = self.version;
        if !version.is_supported() {
            return Err(Error::Version(version).into());
        }
        self.transforms.x.validate()?;
        self.transforms.y.validate()?;
        self.transforms.z.validate()?;
        if self.file_source_id != 0 && !version.has_file_source_id() {
            return Err(Error::Unsupported {
                version,
                feature: "file source id",
            }
            .into());
        }
        if self.gps_time_type.is_standard() && !version.has_global_encoding() {
            return Err(Error::Unsupported {
                version,
                feature: "standard gps time",
            }
            .into());
        }
        if version.requires_point_data_start_signature()
            && !self.vlr_padding.ends_with(&POINT_DATA_START_SIGNATURE)
        {
            self.vlr_padding.extend_from_slice(&POINT_DATA_START_SIGNATURE);
        }

        let mut header = self.template;
        header.file_source_id = self.file_source_id;
        header.set_gps_time_type(self.gps_time_type);
        header.guid = self.guid;
        header.version = version;
        header.system_identifier = self.system_identifier;
        header.generating_software = self.generating_software;
        match self.date {
            Some(date) => header.set_date(date),
            None => {
                header.creation_year = 0;
                header.creation_day_of_year = 0;
            }
        }
        header.point_format = self.point_format;
        header.transforms = self.transforms;
        header.vlrs = self.vlrs;
        header.padding = self.padding;
        header.vlr_padding = self.vlr_padding;
        Ok(header)
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Header::default().into()
    }
}

impl From<Header> for Builder {
    fn from(header: Header) -> Builder {
        Builder {
            date: header.date(),
            file_source_id: header.file_source_id,
            generating_software: header.generating_software.clone(),
            gps_time_type: header.gps_time_type(),
            guid: header.guid,
            padding: header.padding.clone(),
            point_format: header.point_format,
            system_identifier: header.system_identifier.clone(),
            transforms: header.transforms,
            version: header.version,
            vlr_padding: header.vlr_padding.clone(),
            vlrs: header.vlrs.clone(),
            template: header,
        }
    }
}
