use geo::MapCoordsInPlace;
use geo_types::{coord, Geometry};

use crate::value::GeometryValue;

/// Exchanges the first and the second ordinate of every coordinate.
pub fn swap_axes(geometry: &mut Geometry<f64>) {
    geometry.map_coords_in_place(|c| coord! { x: c.y, y: c.x });
}

/// Converts a geometry into the same CRS code with the opposite axis order.
///
/// This is not a reprojection: no coordinate values change, so it never requires a permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisSwap;

impl AxisSwap {
    /// Swaps the axis of the geometry and flips the axis order of its CRS.
    pub fn apply(&self, value: &mut GeometryValue) {
        swap_axes(value.geometry_mut());
        value.set_crs(value.crs().axis_swapped());
    }
}
