//! Precision models of geometry coordinates and their reconciliation.

use geo::MapCoordsInPlace;
use geo_types::coord;

use crate::error::GeoPolicyError;
use crate::value::GeometryValue;

/// Precision model of coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    /// Full `f64` precision.
    #[default]
    Floating,
    /// Coordinates are multiples of `1 / scale`. The scale must be positive and finite, use
    /// [`Precision::fixed`] to construct a checked value.
    Fixed {
        /// Number of grid steps per coordinate unit.
        scale: f64,
    },
}

impl Precision {
    /// Fixed precision model with the given scale.
    ///
    /// ```
    /// use geopolicy::precision::Precision;
    ///
    /// assert!(Precision::fixed(100.0).is_ok());
    /// assert!(Precision::fixed(0.0).is_err());
    /// ```
    pub fn fixed(scale: f64) -> Result<Self, GeoPolicyError> {
        let precision = Precision::Fixed { scale };
        precision.validate()?;
        Ok(precision)
    }

    /// Checks that the scale of a fixed model is positive and finite.
    pub fn validate(&self) -> Result<(), GeoPolicyError> {
        match self {
            Precision::Fixed { scale } if !(scale.is_finite() && *scale > 0.0) => {
                Err(GeoPolicyError::Argument(format!(
                    "precision scale must be a positive finite number but got {scale}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Returns true if the precision keeps fewer significant digits than `other`.
    pub fn is_coarser_than(&self, other: &Precision) -> bool {
        match (self, other) {
            (Precision::Fixed { .. }, Precision::Floating) => true,
            (Precision::Fixed { scale }, Precision::Fixed { scale: other }) => scale < other,
            (Precision::Floating, _) => false,
        }
    }

    /// The coarser of the two models.
    pub fn coarsest(self, other: Precision) -> Precision {
        if other.is_coarser_than(&self) {
            other
        } else {
            self
        }
    }

    /// Rounds the value to this precision.
    pub fn make_precise(&self, value: f64) -> f64 {
        match self {
            Precision::Floating => value,
            Precision::Fixed { scale } => (value * scale).round() / scale,
        }
    }
}

/// Brings both geometries to the coarser of their precision models. The geometry with the finer
/// model has its coordinates rounded.
///
/// Fails without touching the geometries if either of them has an invalid model.
pub fn ensure_precision(
    first: &mut GeometryValue,
    second: &mut GeometryValue,
) -> Result<(), GeoPolicyError> {
    first.precision().validate()?;
    second.precision().validate()?;

    let target = first.precision().coarsest(second.precision());
    apply_precision(first, target)?;
    apply_precision(second, target)
}

/// Rounds the coordinates of the geometry to `precision`, unless it already uses it.
pub(crate) fn apply_precision(
    value: &mut GeometryValue,
    precision: Precision,
) -> Result<(), GeoPolicyError> {
    precision.validate()?;
    if value.precision() == precision {
        return Ok(());
    }

    value.geometry_mut().map_coords_in_place(|c| {
        coord! {
            x: precision.make_precise(c.x),
            y: precision.make_precise(c.y),
        }
    });
    value.set_precision(precision);
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use geo_types::{point, Geometry};
    use geopolicy_types::geo::Crs;

    use super::*;

    fn point_value(x: f64, y: f64, precision: Precision) -> GeometryValue {
        GeometryValue::new(point!(x: x, y: y), Crs::EPSG3857).with_precision(precision)
    }

    fn xy(value: &GeometryValue) -> (f64, f64) {
        match value.geometry() {
            Geometry::Point(p) => (p.x(), p.y()),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn coarsest() {
        let fixed = Precision::Fixed { scale: 10.0 };
        let finer = Precision::Fixed { scale: 1000.0 };

        assert_eq!(Precision::Floating.coarsest(fixed), fixed);
        assert_eq!(fixed.coarsest(Precision::Floating), fixed);
        assert_eq!(finer.coarsest(fixed), fixed);
        assert_eq!(
            Precision::Floating.coarsest(Precision::Floating),
            Precision::Floating
        );
    }

    #[test]
    fn finer_geometry_is_rounded() {
        let mut a = point_value(1.23456, 2.34567, Precision::Floating);
        let mut b = point_value(5.0, 6.0, Precision::Fixed { scale: 100.0 });

        ensure_precision(&mut a, &mut b).expect("valid models");

        let (x, y) = xy(&a);
        assert_relative_eq!(x, 1.23);
        assert_relative_eq!(y, 2.35);
        assert_eq!(a.precision(), Precision::Fixed { scale: 100.0 });
        assert_eq!(xy(&b), (5.0, 6.0));
    }

    #[test]
    fn equal_precision_is_untouched() {
        let mut a = point_value(1.23456, 2.34567, Precision::Floating);
        let mut b = point_value(5.5, 6.5, Precision::Floating);

        ensure_precision(&mut a, &mut b).expect("valid models");

        assert_eq!(xy(&a), (1.23456, 2.34567));
        assert_eq!(xy(&b), (5.5, 6.5));
    }

    #[test]
    fn fixed_scale_must_be_positive_and_finite() {
        assert_eq!(
            Precision::fixed(1000.0).expect("valid scale"),
            Precision::Fixed { scale: 1000.0 }
        );
        for scale in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            assert_matches!(Precision::fixed(scale), Err(GeoPolicyError::Argument(_)));
        }
    }

    #[test]
    fn invalid_model_leaves_coordinates_intact() {
        let mut a = point_value(1.5, 2.5, Precision::Fixed { scale: 0.0 });
        let mut b = point_value(3.25, 4.75, Precision::Floating);

        assert_matches!(
            ensure_precision(&mut a, &mut b),
            Err(GeoPolicyError::Argument(_))
        );
        assert_eq!(xy(&a), (1.5, 2.5));
        assert_eq!(xy(&b), (3.25, 4.75));
        assert_eq!(b.precision(), Precision::Floating);
    }
}
