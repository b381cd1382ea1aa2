//! Bringing geometries into a common coordinate reference system before they are compared.
//!
//! Two kinds of CRS mismatch are distinguished:
//!
//! * the geometries use the same code with different axis order (e.g. EPSG:4326 and CRS84). This is
//!   resolved by swapping the axis and is always allowed;
//! * the codes differ. A real reprojection is needed, which is only allowed for geometries that
//!   carry the transformation permission. Transforming an attribute geometry silently could change
//!   which policy rule matches, so when no geometry may be transformed the caller gets an error
//!   that tells how the attribute must be supplied instead.

use geopolicy_types::geo::Crs;

use crate::error::{AttributeValueDescriptor, GeoPolicyError, MissingAttributeDetail};
use crate::kernel::GeometryKernel;
use crate::transform::{AxisSwap, Reprojection};
use crate::value::{AttributeDesignator, CrsDeclaration, Datatype, GeometryValue, Provenance};

/// What [`CrsReconciler::reconcile_one`] does when the geometry may not be transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDenial {
    /// Return an error.
    Raise,
    /// Return the geometry unchanged as [`SingleReconciliation::Denied`].
    Ignore,
}

/// Result of [`CrsReconciler::reconcile_one`].
#[derive(Debug, Clone, PartialEq)]
pub enum SingleReconciliation {
    /// The geometry is in the target CRS.
    Reconciled(GeometryValue),
    /// The geometry may not be transformed and is returned as it was.
    Denied(GeometryValue),
}

impl SingleReconciliation {
    /// Returns true if the geometry is in the target CRS.
    pub fn is_reconciled(&self) -> bool {
        matches!(self, SingleReconciliation::Reconciled(_))
    }

    /// Returns the geometry.
    pub fn into_inner(self) -> GeometryValue {
        match self {
            SingleReconciliation::Reconciled(value) | SingleReconciliation::Denied(value) => value,
        }
    }
}

/// One of the two geometries of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The first geometry.
    First,
    /// The second geometry.
    Second,
}

/// How a pair of geometries was brought into the same CRS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The geometries were already in the same CRS.
    Unchanged,
    /// The axis of one geometry were swapped.
    AxisSwap(Side),
    /// One geometry was reprojected into the CRS of the other.
    Reprojection(Side),
}

/// Result of [`CrsReconciler::reconcile_pair`]: both geometries in the same CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledPair {
    /// The first geometry.
    pub first: GeometryValue,
    /// The second geometry.
    pub second: GeometryValue,
    /// Which geometry was transformed, and how.
    pub resolution: Resolution,
}

/// Decides whether and how geometries are transformed into a common CRS.
///
/// The reconciler takes geometries by value and returns them, possibly transformed. No geometry is
/// ever shared between two evaluations.
pub struct CrsReconciler<'a> {
    kernel: &'a dyn GeometryKernel,
}

impl<'a> CrsReconciler<'a> {
    /// Creates a reconciler that reprojects with the given kernel.
    pub fn new(kernel: &'a dyn GeometryKernel) -> Self {
        Self { kernel }
    }

    /// Brings the geometry into the `target` CRS.
    ///
    /// An axis swap is always allowed. A reprojection requires the geometry's transformation
    /// permission; without it the result depends on `on_denial`. With [`OnDenial::Raise`] the
    /// geometry yields [`GeoPolicyError::CrsTransformDenied`] asking for the permission. The detail
    /// names no attribute if the geometry is written into the policy.
    pub fn reconcile_one(
        &self,
        mut geometry: GeometryValue,
        target: Crs,
        on_denial: OnDenial,
    ) -> Result<SingleReconciliation, GeoPolicyError> {
        let source = geometry.crs();
        if source == target {
            return Ok(SingleReconciliation::Reconciled(geometry));
        }

        if source.is_axis_swap_of(&target) {
            log::debug!("Swapping axis of geometry from {source} to {target}");
            AxisSwap.apply(&mut geometry);
            return Ok(SingleReconciliation::Reconciled(geometry));
        }

        if geometry.allow_transformation() {
            Reprojection::new(self.kernel, target).apply(&mut geometry)?;
            return Ok(SingleReconciliation::Reconciled(geometry));
        }

        match on_denial {
            OnDenial::Ignore => Ok(SingleReconciliation::Denied(geometry)),
            OnDenial::Raise => Err(permission_required(&geometry, target)),
        }
    }

    /// Brings two geometries into the same CRS.
    ///
    /// * Same code, different axis order: the axis of the geometry with fewer coordinates are
    ///   swapped (the first one on a tie), regardless of permissions.
    /// * Different codes: if only one geometry carries the transformation permission, it is
    ///   reprojected into the CRS of the other one, even if it is the larger one. If both carry
    ///   it, the one with fewer coordinates is reprojected (the first one on a tie).
    /// * Different codes and no permission: an error, see [`GeoPolicyError::PolicyDefect`] and
    ///   [`GeoPolicyError::CrsTransformDenied`].
    pub fn reconcile_pair(
        &self,
        mut first: GeometryValue,
        mut second: GeometryValue,
    ) -> Result<ReconciledPair, GeoPolicyError> {
        if first.crs() == second.crs() {
            return Ok(ReconciledPair {
                first,
                second,
                resolution: Resolution::Unchanged,
            });
        }

        let first_is_smaller = first.coordinate_count() <= second.coordinate_count();

        if first.crs().is_axis_swap_of(&second.crs()) {
            let side = if first_is_smaller {
                AxisSwap.apply(&mut first);
                Side::First
            } else {
                AxisSwap.apply(&mut second);
                Side::Second
            };

            log::debug!("Resolved axis order mismatch by swapping {side:?} geometry");
            return Ok(ReconciledPair {
                first,
                second,
                resolution: Resolution::AxisSwap(side),
            });
        }

        let side = match (first.allow_transformation(), second.allow_transformation()) {
            (false, false) => return Err(transformation_denied(&first, &second)),
            (true, false) => Side::First,
            (false, true) => Side::Second,
            (true, true) if first_is_smaller => Side::First,
            (true, true) => Side::Second,
        };

        match side {
            Side::First => Reprojection::new(self.kernel, second.crs()).apply(&mut first)?,
            Side::Second => Reprojection::new(self.kernel, first.crs()).apply(&mut second)?,
        }

        Ok(ReconciledPair {
            first,
            second,
            resolution: Resolution::Reprojection(side),
        })
    }
}

fn permission_required(geometry: &GeometryValue, target: Crs) -> GeoPolicyError {
    let attribute = match geometry.provenance() {
        Provenance::Policy => {
            log::warn!(
                "Transformation of policy geometry from {} into {target} requires permission",
                geometry.crs()
            );
            None
        }
        Provenance::Attribute(attribute) => {
            log::warn!(
                "Transformation of attribute {} into {target} requires permission",
                attribute.attribute_id
            );
            Some(attribute)
        }
    };

    let mut expected = declared_crs(geometry);
    expected.allow_transformation = Some(true);
    denied(
        "CRS transformation prohibited by 'allowTransformation'",
        attribute,
        expected,
    )
}

fn transformation_denied(first: &GeometryValue, second: &GeometryValue) -> GeoPolicyError {
    let (attribute, geometry, other) = match (first.provenance(), second.provenance()) {
        (Provenance::Policy, Provenance::Policy) => {
            return GeoPolicyError::PolicyDefect(format!(
                "policy compares geometries in {} and {}",
                first.crs(),
                second.crs()
            ));
        }
        (Provenance::Attribute(attribute), _) => (attribute, first, second),
        (Provenance::Policy, Provenance::Attribute(attribute)) => (attribute, second, first),
    };

    log::warn!(
        "Attribute {} must be supplied in {}",
        attribute.attribute_id,
        other.crs()
    );

    denied(
        "Geometry must be encoded using specified CRS",
        Some(attribute),
        required_crs(geometry, other),
    )
}

fn denied(
    message: &'static str,
    attribute: Option<&AttributeDesignator>,
    expected: AttributeValueDescriptor,
) -> GeoPolicyError {
    GeoPolicyError::CrsTransformDenied {
        message,
        detail: Box::new(MissingAttributeDetail {
            attribute: attribute.cloned(),
            data_type: Datatype::Geometry.urn(),
            expected,
        }),
    }
}

/// CRS metadata of the geometry as it was supplied.
fn declared_crs(geometry: &GeometryValue) -> AttributeValueDescriptor {
    match geometry.crs_declaration() {
        CrsDeclaration::Srid => AttributeValueDescriptor {
            srid: Some(geometry.crs().srid()),
            ..Default::default()
        },
        CrsDeclaration::Srs(name) => AttributeValueDescriptor {
            srs: Some(name.clone()),
            ..Default::default()
        },
        CrsDeclaration::Undeclared => AttributeValueDescriptor::default(),
    }
}

/// CRS metadata the geometry must be supplied with to match `other`, stated the same way (SRID or
/// SRS name) the geometry stated its own CRS.
fn required_crs(geometry: &GeometryValue, other: &GeometryValue) -> AttributeValueDescriptor {
    match geometry.crs_declaration() {
        CrsDeclaration::Srid => AttributeValueDescriptor {
            srid: Some(other.crs().srid()),
            ..Default::default()
        },
        CrsDeclaration::Srs(_) => AttributeValueDescriptor {
            srs: Some(other.srs_name()),
            ..Default::default()
        },
        CrsDeclaration::Undeclared => AttributeValueDescriptor {
            srs: Some(other.crs().srs_name()),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geo_types::{line_string, point, Geometry, LineString};

    use super::*;
    use crate::error::StatusCode;
    use crate::tests::{line, RecordingKernel};

    fn designator() -> AttributeDesignator {
        AttributeDesignator::new(
            "urn:oasis:names:tc:xacml:3.0:attribute-category:resource",
            "urn:example:resource:location",
        )
    }

    #[test]
    fn same_crs_is_unchanged() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::new(line(3), Crs::EPSG3857);
        let b = GeometryValue::new(line(5), Crs::EPSG3857);

        let pair = CrsReconciler::new(&kernel)
            .reconcile_pair(a.clone(), b.clone())
            .expect("same crs");

        assert_eq!(pair.resolution, Resolution::Unchanged);
        assert_eq!(pair.first, a);
        assert_eq!(pair.second, b);
        assert_eq!(kernel.reprojections(), 0);
    }

    #[test]
    fn axis_mismatch_swaps_smaller_geometry() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::new(line(4), Crs::EPSG4326);
        let b = GeometryValue::new(line(10), Crs::CRS84);

        let pair = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b.clone())
            .expect("axis swap is always allowed");

        assert_eq!(pair.resolution, Resolution::AxisSwap(Side::First));
        assert_eq!(pair.first.crs(), Crs::CRS84);
        assert_eq!(pair.first.coordinate_count(), 4);
        assert_eq!(pair.second, b);
        assert_eq!(kernel.reprojections(), 0);
    }

    #[test]
    fn axis_mismatch_swaps_second_when_smaller() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::new(line(10), Crs::CRS84);
        let b = GeometryValue::from_attribute(line(2), Crs::EPSG4326, designator());

        let pair = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b)
            .expect("axis swap is always allowed");

        assert_eq!(pair.resolution, Resolution::AxisSwap(Side::Second));
        assert_eq!(pair.second.crs(), Crs::CRS84);
        assert_eq!(kernel.reprojections(), 0);
    }

    #[test]
    fn axis_mismatch_tie_swaps_first() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::new(line(3), Crs::CRS84);
        let b = GeometryValue::new(line(3), Crs::EPSG4326);

        let pair = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b)
            .expect("axis swap is always allowed");

        assert_eq!(pair.resolution, Resolution::AxisSwap(Side::First));
        assert_eq!(pair.first.crs(), Crs::EPSG4326);
    }

    #[test]
    fn policy_geometries_without_permission_are_a_policy_defect() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::new(line(3), Crs::EPSG3857);
        let b = GeometryValue::new(line(3), Crs::EPSG4326);

        let err = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b)
            .expect_err("no permission");

        assert_matches!(err, GeoPolicyError::PolicyDefect(_));
        assert_eq!(err.status(), StatusCode::SyntaxError);
    }

    #[test]
    fn attribute_geometry_without_permission_gets_remediation() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::from_attribute(line(3), Crs::EPSG3857, designator());
        let b = GeometryValue::new(line(3), Crs::EPSG4326);

        let err = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b)
            .expect_err("no permission");

        assert_eq!(err.status(), StatusCode::MissingAttribute);
        let detail = err.missing_attribute().expect("has detail");
        assert_eq!(detail.attribute, Some(designator()));
        assert_eq!(detail.data_type, Datatype::Geometry.urn());
        assert_eq!(detail.expected.srs.as_deref(), Some("EPSG:4326"));
        assert_eq!(detail.expected.srid, None);
        assert_eq!(kernel.reprojections(), 0);
    }

    #[test]
    fn remediation_is_for_the_attribute_geometry_in_second_position() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::new(line(3), Crs::EPSG3857);
        let b = GeometryValue::from_attribute(line(3), Crs::CRS84, designator())
            .with_crs_declaration(CrsDeclaration::Srid);

        let err = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b)
            .expect_err("no permission");

        let detail = err.missing_attribute().expect("has detail");
        assert_eq!(detail.attribute, Some(designator()));
        assert_eq!(detail.expected.srid, Some(3857));
        assert_eq!(detail.expected.srs, None);
    }

    #[test]
    fn remediation_mirrors_declared_srs() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::from_attribute(line(3), Crs::EPSG3857, designator())
            .with_crs_declaration(CrsDeclaration::Srs("EPSG:3857".into()));
        let b = GeometryValue::new(line(3), Crs::CRS84)
            .with_crs_declaration(CrsDeclaration::Srs("urn:ogc:def:crs:OGC::CRS84".into()));

        let err = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b)
            .expect_err("no permission");

        let detail = err.missing_attribute().expect("has detail");
        assert_eq!(
            detail.expected.srs.as_deref(),
            Some("urn:ogc:def:crs:OGC::CRS84")
        );
        assert_eq!(detail.expected.srid, None);
    }

    #[test]
    fn first_attribute_geometry_is_reported() {
        let kernel = RecordingKernel::default();
        let other = AttributeDesignator::new("urn:example:category", "urn:example:other");
        let a = GeometryValue::from_attribute(line(3), Crs::EPSG3857, designator());
        let b = GeometryValue::from_attribute(line(3), Crs::EPSG4326, other);

        let err = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b)
            .expect_err("no permission");

        assert_eq!(
            err.missing_attribute().and_then(|d| d.attribute.as_ref()),
            Some(&designator())
        );
    }

    #[test]
    fn only_permitted_geometry_is_reprojected_even_if_larger() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::new(line(10), Crs::CRS84).with_allow_transformation(true);
        let b = GeometryValue::new(line(2), Crs::EPSG3857);

        let pair = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b)
            .expect("permitted");

        assert_eq!(pair.resolution, Resolution::Reprojection(Side::First));
        assert_eq!(pair.first.crs(), Crs::EPSG3857);
        assert_eq!(pair.first.coordinate_count(), 10);
        assert!(!pair.first.allow_transformation());
        assert_eq!(kernel.reprojections(), 1);
    }

    #[test]
    fn only_second_permitted() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::new(line(2), Crs::EPSG3857);
        let b = GeometryValue::new(line(10), Crs::CRS84).with_allow_transformation(true);

        let pair = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b)
            .expect("permitted");

        assert_eq!(pair.resolution, Resolution::Reprojection(Side::Second));
        assert_eq!(pair.second.crs(), Crs::EPSG3857);
    }

    #[test]
    fn both_permitted_reprojects_smaller() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::new(line(10), Crs::CRS84).with_allow_transformation(true);
        let b = GeometryValue::new(line(2), Crs::EPSG3857).with_allow_transformation(true);

        let pair = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b)
            .expect("permitted");

        assert_eq!(pair.resolution, Resolution::Reprojection(Side::Second));
        assert_eq!(pair.second.crs(), Crs::CRS84);
        assert!(pair.first.allow_transformation());
    }

    #[test]
    fn both_permitted_tie_reprojects_first() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::new(line(2), Crs::CRS84).with_allow_transformation(true);
        let b = GeometryValue::new(line(2), Crs::EPSG3857).with_allow_transformation(true);

        let pair = CrsReconciler::new(&kernel)
            .reconcile_pair(a, b)
            .expect("permitted");

        assert_eq!(pair.resolution, Resolution::Reprojection(Side::First));
    }

    #[test]
    fn reconcile_one_axis_swap_is_its_own_inverse() {
        let kernel = RecordingKernel::default();
        let original = GeometryValue::from_attribute(
            line_string![(x: 52.0, y: 13.0), (x: 48.0, y: 2.0)],
            Crs::EPSG4326,
            designator(),
        );
        let reconciler = CrsReconciler::new(&kernel);

        let swapped = reconciler
            .reconcile_one(original.clone(), Crs::CRS84, OnDenial::Raise)
            .expect("axis swap is always allowed")
            .into_inner();
        assert_eq!(swapped.crs(), Crs::CRS84);
        assert_eq!(
            swapped.geometry(),
            &Geometry::from(line_string![(x: 13.0, y: 52.0), (x: 2.0, y: 48.0)])
        );

        let restored = reconciler
            .reconcile_one(swapped, Crs::EPSG4326, OnDenial::Raise)
            .expect("axis swap is always allowed")
            .into_inner();
        assert_eq!(restored, original);
        assert_eq!(kernel.reprojections(), 0);
    }

    #[test]
    fn reconcile_one_reprojects_permitted_geometry() {
        let kernel = RecordingKernel::default();
        let value = GeometryValue::new(point!(x: 0.0, y: 180.0), Crs::EPSG4326)
            .with_allow_transformation(true);

        let result = CrsReconciler::new(&kernel)
            .reconcile_one(value, Crs::EPSG3857, OnDenial::Raise)
            .expect("permitted");

        assert!(result.is_reconciled());
        assert_eq!(result.into_inner().crs(), Crs::EPSG3857);
        assert_eq!(kernel.reprojections(), 1);
    }

    #[test]
    fn reconcile_one_ignored_denial() {
        let kernel = RecordingKernel::default();
        let value = GeometryValue::from_attribute(line(3), Crs::EPSG3857, designator());

        let result = CrsReconciler::new(&kernel)
            .reconcile_one(value.clone(), Crs::EPSG4326, OnDenial::Ignore)
            .expect("denial is ignored");

        assert_eq!(result, SingleReconciliation::Denied(value));
    }

    #[test]
    fn reconcile_one_raised_denial_asks_for_permission() {
        let kernel = RecordingKernel::default();
        let value = GeometryValue::from_attribute(line(3), Crs::EPSG3857, designator())
            .with_crs_declaration(CrsDeclaration::Srid);

        let err = CrsReconciler::new(&kernel)
            .reconcile_one(value, Crs::EPSG4326, OnDenial::Raise)
            .expect_err("no permission");

        let detail = err.missing_attribute().expect("has detail");
        assert_eq!(detail.attribute, Some(designator()));
        assert_eq!(detail.expected.allow_transformation, Some(true));
        assert_eq!(detail.expected.srid, Some(3857));
    }

    #[test]
    fn reconcile_one_policy_geometry_asks_for_permission() {
        let kernel = RecordingKernel::default();
        let value = GeometryValue::new(line(3), Crs::EPSG3857)
            .with_crs_declaration(CrsDeclaration::Srid);

        let err = CrsReconciler::new(&kernel)
            .reconcile_one(value, Crs::EPSG4326, OnDenial::Raise)
            .expect_err("no permission");

        assert_matches!(err, GeoPolicyError::CrsTransformDenied { .. });
        assert_eq!(err.status(), StatusCode::MissingAttribute);
        let detail = err.missing_attribute().expect("has detail");
        assert_eq!(detail.attribute, None);
        assert_eq!(detail.expected.allow_transformation, Some(true));
        assert_eq!(detail.expected.srid, Some(3857));
        assert_eq!(kernel.reprojections(), 0);
    }

    #[test]
    fn kernel_failure_is_propagated() {
        let kernel = RecordingKernel::default();
        let a = GeometryValue::new(line(2), Crs::new(2154)).with_allow_transformation(true);
        let b = GeometryValue::new(LineString::<f64>::new(vec![]), Crs::EPSG3857);

        assert_matches!(
            CrsReconciler::new(&kernel).reconcile_pair(a, b),
            Err(GeoPolicyError::Kernel(_))
        );
    }
}
