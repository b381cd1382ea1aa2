//! Traits for points in cartesian (projected) coordinates.

use num_traits::Float;

/// Point in a 2d cartesian coordinate space.
pub trait CartesianPoint2d {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// X coordinate (easting).
    fn x(&self) -> Self::Num;
    /// Y coordinate (northing).
    fn y(&self) -> Self::Num;

    /// Returns true if both coordinates are finite numbers.
    fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }
}

/// Cartesian point that can be constructed from its coordinates.
pub trait NewCartesianPoint2d<Num = f64>: CartesianPoint2d<Num = Num> {
    /// Creates a new point.
    fn new(x: Num, y: Num) -> Self;
}
