use crate::{Error, Result};
use std::fmt;

/// A scale and an offset that transforms xyz coordinates.
///
/// Coordinates are stored as scaled `i32`s, so a transform only keeps precision down to its
/// scale:
///
/// ```
/// use lasfile::Transform;
/// let transform = Transform { scale: 0.01, offset: 100. };
/// let raw = transform.to_raw(123.456).unwrap();
/// assert_eq!(2346, raw);
/// assert!((transform.to_real(raw) - 123.46).abs() < 1e-9);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// The scale.
    pub scale: f64,
    /// The offset.
    pub offset: f64,
}

impl Transform {
    /// Applies this transform to an i32, returning a float.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lasfile::Transform;
    /// let transform = Transform { scale: 2., offset: 1. };
    /// assert_eq!(3., transform.to_real(1));
    /// ```
    pub fn to_real(&self, n: i32) -> f64 {
        self.scale * f64::from(n) + self.offset
    }

    /// Applies the inverse transform, and rounds the result.
    ///
    /// Returns an error if the scale is zero or not finite, or if the resultant value can't be
    /// represented as an i32.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lasfile::Transform;
    /// let transform = Transform { scale: 2., offset: 1. };
    /// assert_eq!(1, transform.to_raw(2.9).unwrap());
    /// assert!(Transform { scale: 0., offset: 0. }.to_raw(1.).is_err());
    /// ```
    pub fn to_raw(&self, n: f64) -> Result<i32> {
        self.validate()?;
        let n = ((n - self.offset) / self.scale).round();
        if n.is_nan() || n > f64::from(i32::MAX) || n < f64::from(i32::MIN) {
            Err(Error::InverseTransform(n, *self))
        } else {
            Ok(n as i32)
        }
    }

    /// Checks that this transform can be inverted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lasfile::Transform;
    /// assert!(Transform::default().validate().is_ok());
    /// assert!(Transform { scale: f64::NAN, offset: 0. }.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0. || !self.scale.is_finite() {
            Err(Error::ConfigurationError(*self))
        } else {
            Ok(())
        }
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform {
            scale: 0.01,
            offset: 0.,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{} * x + {}`", self.scale, self.offset)
    }
}
