/// An xyz collection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector<T> {
    /// X
    pub x: T,
    /// Y
    pub y: T,
    /// Z
    pub z: T,
}

impl<T: Copy> Vector<T> {
    /// Creates a vector with the same value for each dimension.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasfile::Vector;
    /// let vector = Vector::splat(0.01);
    /// assert_eq!(0.01, vector.z);
    /// ```
    pub fn splat(value: T) -> Vector<T> {
        Vector {
            x: value,
            y: value,
            z: value,
        }
    }

    /// Returns the values as an `[x, y, z]` array.
    pub fn to_array(&self) -> [T; 3] {
        [self.x, self.y, self.z]
    }
}

impl<T> From<[T; 3]> for Vector<T> {
    fn from([x, y, z]: [T; 3]) -> Vector<T> {
        Vector { x, y, z }
    }
}
