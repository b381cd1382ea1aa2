//! Primitive types used by `geopolicy` to reason about the coordinate reference system (CRS) of
//! geometries: point traits, the [`Crs`](geo::Crs) value with explicit axis order, and projections
//! between geographic and projected coordinates.
//!
//! The [`geo_types::Coord`] type implements both [`GeoPoint`](geo::GeoPoint) (x is longitude, y is
//! latitude) and [`CartesianPoint2d`](cartesian::CartesianPoint2d), so any projection in this crate
//! can be applied to `geo` geometries coordinate by coordinate.

pub mod cartesian;
pub mod error;
pub mod geo;

#[cfg(feature = "geo-types")]
mod geo_types;
