use geopolicy_types::geo::Crs;

use super::axis_swap::swap_axes;
use crate::kernel::{GeometryKernel, KernelError};
use crate::value::GeometryValue;

/// Transforms a geometry into another CRS using the reprojection of a [`GeometryKernel`].
///
/// The kernel works with the easting (longitude) first. Coordinates of a northing-first CRS (such
/// as EPSG:4326 in its native order) are swapped before the kernel is called, and swapped back
/// after it if the target CRS is northing-first.
pub struct Reprojection<'a> {
    kernel: &'a dyn GeometryKernel,
    target: Crs,
}

impl<'a> Reprojection<'a> {
    /// Creates a transform into `target`.
    pub fn new(kernel: &'a dyn GeometryKernel, target: Crs) -> Self {
        Self { kernel, target }
    }

    /// Reprojects the geometry and sets its CRS to the target. A reprojected value loses its
    /// permission to be transformed again.
    pub fn apply(&self, value: &mut GeometryValue) -> Result<(), KernelError> {
        let source = value.crs();
        log::debug!("Reprojecting geometry from {source} to {}", self.target);

        let geometry = value.geometry_mut();
        if source.is_northing_first() {
            swap_axes(geometry);
        }

        self.kernel
            .reproject(geometry, source.code(), self.target.code())?;

        if self.target.is_northing_first() {
            swap_axes(geometry);
        }

        value.set_crs(self.target);
        value.revoke_transformation();
        Ok(())
    }
}
