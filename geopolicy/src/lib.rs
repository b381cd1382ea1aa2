//! Geopolicy adds geospatial reasoning to attribute-based access-control policies: policies can
//! measure geometries, compare their coordinate reference systems and test spatial relations
//! between a location supplied by the requester and a region written into the policy.
//!
//! # Quick start
//!
//! ```
//! use geo_types::{point, polygon};
//! use geopolicy::function::{FunctionRegistry, RELATE};
//! use geopolicy::value::{AttributeDesignator, GeometryValue, Value};
//! use geopolicy_types::geo::Crs;
//!
//! let registry = FunctionRegistry::default();
//!
//! // Region written into the policy, longitude first.
//! let region = GeometryValue::new(
//!     polygon![(x: 13.0, y: 52.0), (x: 14.0, y: 52.0), (x: 14.0, y: 53.0), (x: 13.0, y: 53.0)],
//!     Crs::CRS84,
//! );
//!
//! // Position of the subject, latitude first as EPSG:4326 defines it.
//! let position = GeometryValue::from_attribute(
//!     point!(x: 52.5, y: 13.4),
//!     Crs::EPSG4326,
//!     AttributeDesignator::new(
//!         "urn:oasis:names:tc:xacml:1.0:subject-category:access-subject",
//!         "urn:example:subject:position",
//!     ),
//! );
//!
//! let within = registry
//!     .evaluate(RELATE, vec![position.into(), region.into(), "T*F**F***".into()])
//!     .unwrap();
//! assert_eq!(within, Value::Boolean(true));
//! ```
//!
//! # CRS reconciliation
//!
//! Two geometries can only be compared when they use the same CRS. Before a function compares
//! them, the [`CrsReconciler`](reconcile::CrsReconciler) decides what to do:
//!
//! * same code with different axis order (EPSG:4326 and CRS84) is resolved by swapping the axis
//!   of the smaller geometry. This is always allowed;
//! * different codes require a reprojection. It is only performed for a geometry that carries
//!   the [`allow_transformation`](value::GeometryValue::allow_transformation) permission.
//!   Otherwise the evaluation fails with an error that tells the caller which attribute must be
//!   supplied differently (see [`GeoPolicyError`](error::GeoPolicyError)).
//!
//! The geometric computations themselves are done by a [`GeometryKernel`](kernel::GeometryKernel).
//! [`GeoKernel`](kernel::GeoKernel), based on the `geo` crate, is used by default.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod error;
pub mod function;
pub mod kernel;
pub mod precision;
pub mod reconcile;
pub mod transform;
pub mod value;

#[cfg(test)]
pub(crate) mod tests;

// Reexport geopolicy_types
pub use geopolicy_types;
