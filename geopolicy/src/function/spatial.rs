use geopolicy_types::geo::Crs;

use super::{Arguments, GeometryFunction};
use crate::error::GeoPolicyError;
use crate::kernel::{GeometryKernel, RelatePattern};
use crate::precision::ensure_precision;
use crate::reconcile::{CrsReconciler, ReconciledPair};
use crate::value::{Datatype, Value};

/// `geometry-length`: length of the geometry, perimeter for polygons.
pub const LENGTH: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-length";
/// `geometry-area`: area of the polygonal components.
pub const AREA: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-area";
/// `geometry-dimension`: topological dimension, `-1` for an empty geometry.
pub const DIMENSION: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-dimension";
/// `geometry-type`: simple features type name.
pub const GEOMETRY_TYPE: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-type";
/// `geometry-srid`: signed SRID of the geometry.
pub const SRID: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-srid";
/// `geometry-is-simple`
pub const IS_SIMPLE: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-is-simple";
/// `geometry-is-empty`
pub const IS_EMPTY: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-is-empty";
/// `geometry-srid-equals`: compares the signed SRID with an integer.
pub const SRID_EQUALS: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-srid-equals";
/// `geometry-srs-equals`: compares the CRS with an SRS name such as `EPSG:3857` or `CRS84`.
pub const SRS_EQUALS: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-srs-equals";
/// `geometry-distance`: minimum distance between two geometries.
pub const DISTANCE: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-distance";
/// `geometry-is-within-distance`
pub const IS_WITHIN_DISTANCE: &str =
    "urn:ogc:def:function:geoxacml:3.0:geometry-is-within-distance";
/// `geometry-equals-distance`: the distance is exactly the given value.
pub const EQUALS_DISTANCE: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-equals-distance";
/// `geometry-relate`: the DE-9IM matrix matches the pattern.
pub const RELATE: &str = "urn:ogc:def:function:geoxacml:3.0:geometry-relate";

const UNARY: &[Datatype] = &[Datatype::Geometry];
const PAIR: &[Datatype] = &[Datatype::Geometry, Datatype::Geometry];
const PAIR_WITH_DISTANCE: &[Datatype] =
    &[Datatype::Geometry, Datatype::Geometry, Datatype::Double];

pub(super) fn functions() -> Vec<GeometryFunction> {
    vec![
        GeometryFunction::new(LENGTH, UNARY, Datatype::Double, length),
        GeometryFunction::new(AREA, UNARY, Datatype::Double, area),
        GeometryFunction::new(DIMENSION, UNARY, Datatype::Integer, dimension),
        GeometryFunction::new(GEOMETRY_TYPE, UNARY, Datatype::String, geometry_type),
        GeometryFunction::new(SRID, UNARY, Datatype::Integer, srid),
        GeometryFunction::new(IS_SIMPLE, UNARY, Datatype::Boolean, is_simple),
        GeometryFunction::new(IS_EMPTY, UNARY, Datatype::Boolean, is_empty),
        GeometryFunction::new(
            SRID_EQUALS,
            &[Datatype::Geometry, Datatype::Integer],
            Datatype::Boolean,
            srid_equals,
        ),
        GeometryFunction::new(
            SRS_EQUALS,
            &[Datatype::Geometry, Datatype::String],
            Datatype::Boolean,
            srs_equals,
        ),
        GeometryFunction::new(DISTANCE, PAIR, Datatype::Double, distance),
        GeometryFunction::new(
            IS_WITHIN_DISTANCE,
            PAIR_WITH_DISTANCE,
            Datatype::Boolean,
            is_within_distance,
        ),
        GeometryFunction::new(
            EQUALS_DISTANCE,
            PAIR_WITH_DISTANCE,
            Datatype::Boolean,
            equals_distance,
        ),
        GeometryFunction::new(
            RELATE,
            &[Datatype::Geometry, Datatype::Geometry, Datatype::String],
            Datatype::Boolean,
            relate,
        ),
    ]
}

fn length(kernel: &dyn GeometryKernel, mut args: Arguments) -> Result<Value, GeoPolicyError> {
    Ok(kernel.length(args.geometry()?.geometry()).into())
}

fn area(kernel: &dyn GeometryKernel, mut args: Arguments) -> Result<Value, GeoPolicyError> {
    Ok(kernel.area(args.geometry()?.geometry()).into())
}

fn dimension(kernel: &dyn GeometryKernel, mut args: Arguments) -> Result<Value, GeoPolicyError> {
    Ok(kernel.dimension(args.geometry()?.geometry()).into())
}

fn geometry_type(
    kernel: &dyn GeometryKernel,
    mut args: Arguments,
) -> Result<Value, GeoPolicyError> {
    Ok(kernel.geometry_type(args.geometry()?.geometry()).into())
}

fn srid(_: &dyn GeometryKernel, mut args: Arguments) -> Result<Value, GeoPolicyError> {
    Ok(args.geometry()?.crs().srid().into())
}

fn is_simple(kernel: &dyn GeometryKernel, mut args: Arguments) -> Result<Value, GeoPolicyError> {
    Ok(kernel.is_simple(args.geometry()?.geometry()).into())
}

fn is_empty(kernel: &dyn GeometryKernel, mut args: Arguments) -> Result<Value, GeoPolicyError> {
    Ok(kernel.is_empty(args.geometry()?.geometry()).into())
}

fn srid_equals(_: &dyn GeometryKernel, mut args: Arguments) -> Result<Value, GeoPolicyError> {
    let geometry = args.geometry()?;
    let srid = args.integer()?;
    Ok((geometry.crs().srid() == srid).into())
}

fn srs_equals(_: &dyn GeometryKernel, mut args: Arguments) -> Result<Value, GeoPolicyError> {
    let geometry = args.geometry()?;
    let crs: Crs = args.string()?.parse()?;
    Ok((geometry.crs() == crs).into())
}

/// Takes two geometries from the arguments and brings them to a common precision and CRS.
fn reconciled_pair(
    kernel: &dyn GeometryKernel,
    args: &mut Arguments,
) -> Result<ReconciledPair, GeoPolicyError> {
    let mut first = args.geometry()?;
    let mut second = args.geometry()?;
    ensure_precision(&mut first, &mut second)?;
    CrsReconciler::new(kernel).reconcile_pair(first, second)
}

fn distance(kernel: &dyn GeometryKernel, mut args: Arguments) -> Result<Value, GeoPolicyError> {
    let pair = reconciled_pair(kernel, &mut args)?;
    Ok(kernel
        .distance(pair.first.geometry(), pair.second.geometry())?
        .into())
}

fn is_within_distance(
    kernel: &dyn GeometryKernel,
    mut args: Arguments,
) -> Result<Value, GeoPolicyError> {
    let pair = reconciled_pair(kernel, &mut args)?;
    let distance = args.double()?;
    Ok(kernel
        .is_within_distance(pair.first.geometry(), pair.second.geometry(), distance)?
        .into())
}

fn equals_distance(
    kernel: &dyn GeometryKernel,
    mut args: Arguments,
) -> Result<Value, GeoPolicyError> {
    let pair = reconciled_pair(kernel, &mut args)?;
    let expected = args.double()?;
    let distance = kernel.distance(pair.first.geometry(), pair.second.geometry())?;
    Ok((distance == expected).into())
}

fn relate(kernel: &dyn GeometryKernel, mut args: Arguments) -> Result<Value, GeoPolicyError> {
    let pair = reconciled_pair(kernel, &mut args)?;
    let pattern: RelatePattern = args.string()?.parse().map_err(GeoPolicyError::Argument)?;
    Ok(kernel
        .relate(pair.first.geometry(), pair.second.geometry(), &pattern)?
        .into())
}
