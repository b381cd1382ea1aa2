use geo_types::{Geometry, GeometryCollection};
use geopolicy_types::geo::Crs;

use super::{Arguments, GeometryFunction};
use crate::error::GeoPolicyError;
use crate::kernel::GeometryKernel;
use crate::precision::{apply_precision, Precision};
use crate::reconcile::{CrsReconciler, OnDenial};
use crate::value::{Datatype, GeometryValue, Value};

/// `geometry-bag-from-collection`: members of a geometry collection or multi-geometry as a bag.
pub const BAG_FROM_COLLECTION: &str =
    "urn:ogc:def:function:geoxacml:3.0:geometry-bag-from-collection";
/// `geometry-bag-to-collection`: geometry collection made of the geometries of a bag, which must
/// all have the same type.
pub const BAG_TO_COLLECTION: &str =
    "urn:ogc:def:function:geoxacml:3.0:geometry-bag-to-collection";

pub(super) fn functions() -> Vec<GeometryFunction> {
    vec![
        GeometryFunction::new(
            BAG_FROM_COLLECTION,
            &[Datatype::Geometry],
            Datatype::GeometryBag,
            bag_from_collection,
        ),
        GeometryFunction::new(
            BAG_TO_COLLECTION,
            &[Datatype::GeometryBag],
            Datatype::Geometry,
            bag_to_collection,
        ),
    ]
}

fn bag_from_collection(
    kernel: &dyn GeometryKernel,
    mut args: Arguments,
) -> Result<Value, GeoPolicyError> {
    let value = args.geometry()?;
    let members: Vec<Geometry<f64>> = match value.geometry() {
        Geometry::GeometryCollection(collection) => collection.0.clone(),
        Geometry::MultiPoint(points) => points.0.iter().copied().map(Geometry::from).collect(),
        Geometry::MultiLineString(lines) => {
            lines.0.iter().cloned().map(Geometry::from).collect()
        }
        Geometry::MultiPolygon(polygons) => {
            polygons.0.iter().cloned().map(Geometry::from).collect()
        }
        other => {
            return Err(GeoPolicyError::Argument(format!(
                "{BAG_FROM_COLLECTION} requires a geometry collection but got {}",
                kernel.geometry_type(other)
            )));
        }
    };

    Ok(members
        .into_iter()
        .map(|member| value.derive(member))
        .collect::<Vec<_>>()
        .into())
}

fn bag_to_collection(
    kernel: &dyn GeometryKernel,
    mut args: Arguments,
) -> Result<Value, GeoPolicyError> {
    let mut members = args.bag()?.into_iter();
    let Some(first) = members.next() else {
        return Ok(GeometryValue::new(
            Geometry::GeometryCollection(GeometryCollection::default()),
            Crs::CRS84,
        )
        .into());
    };

    let type_name = kernel.geometry_type(first.geometry());
    let target = first.crs();
    let template = first.derive(Geometry::GeometryCollection(GeometryCollection::default()));
    let reconciler = CrsReconciler::new(kernel);

    let mut reconciled = vec![first];
    for member in members {
        let member_type = kernel.geometry_type(member.geometry());
        if member_type != type_name {
            return Err(GeoPolicyError::Argument(format!(
                "a geometry collection must be homogeneous but the bag contains {type_name} and {member_type}"
            )));
        }

        reconciled.push(
            reconciler
                .reconcile_one(member, target, OnDenial::Raise)?
                .into_inner(),
        );
    }

    let precision = reconciled.iter().map(GeometryValue::precision).try_fold(
        Precision::Floating,
        |coarsest, precision| {
            precision.validate()?;
            Ok::<_, GeoPolicyError>(coarsest.coarsest(precision))
        },
    )?;
    for member in &mut reconciled {
        apply_precision(member, precision)?;
    }

    let count = reconciled.len();
    let collection: GeometryCollection<f64> = reconciled
        .into_iter()
        .map(GeometryValue::into_geometry)
        .collect();
    let mut result = template.derive(Geometry::GeometryCollection(collection));
    result.set_precision(precision);

    log::debug!("Created collection of {count} {type_name} geometries in {target}");
    Ok(result.into())
}
