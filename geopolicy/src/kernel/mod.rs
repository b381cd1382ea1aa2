//! Geometric measures and predicates used by the policy functions.
//!
//! The functions never compute anything themselves: they reconcile the CRS of their arguments and
//! delegate to a [`GeometryKernel`]. [`GeoKernel`] is the default implementation on top of the `geo`
//! crate.

use geo_types::Geometry;
use thiserror::Error;

mod geo_kernel;
mod measure;
mod relate;

pub use geo_kernel::{GeoKernel, GeoKernelBuilder, KernelConfig, ProjectionConfig};
pub use relate::RelatePattern;

/// Failure of a geometry computation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    /// Geometry has NaN or infinite coordinates.
    #[error("geometry contains non-finite coordinates")]
    NonFiniteCoordinate,
    /// No projection is known for the code.
    #[error("no projection is known for EPSG:{0}")]
    UnsupportedCrs(u32),
    /// A coordinate is outside of the domain of a projection.
    #[error("coordinate ({x}, {y}) cannot be transformed from EPSG:{from} to EPSG:{to}")]
    Projection {
        /// Source code.
        from: u32,
        /// Target code.
        to: u32,
        /// First ordinate of the failing coordinate.
        x: f64,
        /// Second ordinate of the failing coordinate.
        y: f64,
    },
}

/// Geometric operations on planar geometries.
///
/// All operations treat the first ordinate as `x` and the second as `y`. Callers are responsible
/// for bringing two geometries into the same CRS before calling a binary operation.
pub trait GeometryKernel: Send + Sync {
    /// Length of the linear components, perimeter for polygons, `0` for points.
    fn length(&self, geometry: &Geometry<f64>) -> f64;

    /// Area of the polygonal components.
    fn area(&self, geometry: &Geometry<f64>) -> f64;

    /// Topological dimension: `0` for points, `1` for curves, `2` for surfaces, `-1` if empty.
    fn dimension(&self, geometry: &Geometry<f64>) -> i64;

    /// Simple features type name, e.g. `Polygon` or `GeometryCollection`.
    fn geometry_type(&self, geometry: &Geometry<f64>) -> &'static str;

    /// Returns true if the geometry has no anomalous points such as self-intersections.
    fn is_simple(&self, geometry: &Geometry<f64>) -> bool;

    /// Returns true if the geometry has no coordinates.
    fn is_empty(&self, geometry: &Geometry<f64>) -> bool;

    /// Minimum distance between the two geometries, `0` if they intersect.
    fn distance(&self, a: &Geometry<f64>, b: &Geometry<f64>) -> Result<f64, KernelError>;

    /// Returns true if the distance between the geometries is not greater than `distance`.
    fn is_within_distance(
        &self,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
        distance: f64,
    ) -> Result<bool, KernelError> {
        Ok(self.distance(a, b)? <= distance)
    }

    /// Returns true if the DE-9IM intersection matrix of the geometries matches the pattern.
    fn relate(
        &self,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
        pattern: &RelatePattern,
    ) -> Result<bool, KernelError>;

    /// Transforms the coordinates from the CRS with code `from` into the CRS with code `to`.
    ///
    /// Coordinates are expected and produced with the easting (longitude) first, regardless of
    /// the axis order the registry defines for the codes.
    fn reproject(
        &self,
        geometry: &mut Geometry<f64>,
        from: u32,
        to: u32,
    ) -> Result<(), KernelError>;
}
