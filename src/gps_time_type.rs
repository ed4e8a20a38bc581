const GPS_TIME_TYPE_MASK: u16 = 1;

/// The meaning of GPS time in the point records, stored in the low bit of the global encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GpsTimeType {
    /// GPS Week Time (the same as previous versions of LAS).
    #[default]
    Week,
    /// Standard GPS Time minus 1e9.
    Standard,
}

impl GpsTimeType {
    /// Returns true if this time type is gps standard time.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::GpsTimeType;
    /// assert!(!GpsTimeType::Week.is_standard());
    /// assert!(GpsTimeType::Standard.is_standard());
    /// ```
    pub fn is_standard(&self) -> bool {
        matches!(self, GpsTimeType::Standard)
    }

    /// Sets or clears this time type's bit in a global encoding word.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::GpsTimeType;
    /// assert_eq!(0b1001, GpsTimeType::Standard.apply_to(0b1000));
    /// assert_eq!(0b1000, GpsTimeType::Week.apply_to(0b1001));
    /// ```
    pub fn apply_to(&self, global_encoding: u16) -> u16 {
        match self {
            GpsTimeType::Week => global_encoding & !GPS_TIME_TYPE_MASK,
            GpsTimeType::Standard => global_encoding | GPS_TIME_TYPE_MASK,
        }
    }
}

impl From<u16> for GpsTimeType {
    fn from(global_encoding: u16) -> GpsTimeType {
        if global_encoding & GPS_TIME_TYPE_MASK == GPS_TIME_TYPE_MASK {
            GpsTimeType::Standard
        } else {
            GpsTimeType::Week
        }
    }
}
