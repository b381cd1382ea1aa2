//! Geographic coordinates (latitude and longitude), coordinate reference systems (see [`Crs`]) and
//! conversion between geographic and projected coordinates (see [`Projection`]).

mod crs;
mod datum;
pub mod impls;
mod traits;

pub use crs::{AxisOrder, Crs, ProjectionType};
pub use datum::Datum;
pub use traits::point::{GeoPoint, NewGeoPoint};
pub use traits::projection::{ChainProjection, InvertedProjection, Projection};
