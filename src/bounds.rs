use crate::{Point, Vector};

/// Minimum and maximum bounds in three dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// The minimum values.
    pub min: Vector<f64>,

    /// The maximum values.
    pub max: Vector<f64>,
}

impl Bounds {
    /// Returns bounds that contain nothing, so that the first `grow` snaps to a point.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Bounds;
    /// let bounds = Bounds::empty();
    /// assert!(bounds.is_empty());
    /// ```
    pub fn empty() -> Bounds {
        Bounds {
            min: Vector::splat(f64::INFINITY),
            max: Vector::splat(f64::NEG_INFINITY),
        }
    }

    /// Returns true if these bounds have never been grown.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grows the bounds to encompass this point in xyz space.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lasfile::{Bounds, Point};
    /// let point = Point { x: 1., y: 2., z: 3., ..Default::default() };
    /// let mut bounds = Bounds::empty();
    /// bounds.grow(&point);
    /// assert_eq!(1., bounds.min.x);
    /// assert_eq!(3., bounds.max.z);
    /// ```
    pub fn grow(&mut self, point: &Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }
}

/// The default bounds are all zeros, which is what an empty las file carries in its header.
impl Default for Bounds {
    fn default() -> Bounds {
        Bounds {
            min: Vector::default(),
            max: Vector::default(),
        }
    }
}
