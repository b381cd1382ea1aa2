use std::marker::PhantomData;

use geodesy::prelude::*;

use crate::cartesian::NewCartesianPoint2d;
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::Projection;

/// Projection defined by a `geodesy` operator, e.g. `utm zone=32` or
/// `tmerc lat_0=0 lon_0=9 k_0=0.9996 x_0=500000`.
///
/// `geodesy` expects geographic coordinates in radians, longitude first.
pub struct GeodesyProjection<In, Out> {
    context: Minimal,
    op: OpHandle,
    points: PhantomData<(In, Out)>,
}

impl<In, Out> GeodesyProjection<In, Out> {
    /// Creates the projection. Returns `None` if `geodesy` does not accept the definition.
    pub fn new(definition: &str) -> Option<Self> {
        let mut context = Minimal::new();
        let op = context.op(definition).ok()?;
        Some(Self {
            context,
            op,
            points: PhantomData,
        })
    }

    fn run(&self, direction: Direction, coord: Coor2D) -> Option<Coor2D> {
        let mut operands = [coord];
        self.context.apply(self.op, direction, &mut operands).ok()?;

        let [result] = operands;
        (result.0[0].is_finite() && result.0[1].is_finite()).then_some(result)
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection
    for GeodesyProjection<In, Out>
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let Coor2D([x, y]) = self.run(Fwd, Coor2D::geo(input.lat(), input.lon()))?;
        Some(Out::new(x, y))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let Coor2D([lon, lat]) = self.run(Inv, Coor2D([input.x(), input.y()]))?;
        Some(In::latlon(lat.to_degrees(), lon.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::cartesian::CartesianPoint2d;
    use crate::geo::impls::GeoPoint2d;
    use crate::geo::GeoPoint;
    use crate::latlon;

    #[derive(Debug, Clone, Copy)]
    struct Xy(f64, f64);

    impl CartesianPoint2d for Xy {
        type Num = f64;

        fn x(&self) -> f64 {
            self.0
        }

        fn y(&self) -> f64 {
            self.1
        }
    }

    impl NewCartesianPoint2d for Xy {
        fn new(x: f64, y: f64) -> Self {
            Self(x, y)
        }
    }

    #[test]
    fn utm_central_meridian() {
        let projection =
            GeodesyProjection::<GeoPoint2d, Xy>::new("utm zone=32").expect("valid definition");
        let projected = projection
            .project(&latlon!(0.0, 9.0))
            .expect("point inside the zone");

        assert_abs_diff_eq!(projected.x(), 500_000.0, epsilon = 1e-3);
        assert_abs_diff_eq!(projected.y(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn unproject_southern_zone() {
        let projection = GeodesyProjection::<GeoPoint2d, Xy>::new("utm zone=33 south")
            .expect("valid definition");
        let point = projection
            .unproject(&Xy(500_000.0, 10_000_000.0))
            .expect("false northing of the zone");

        assert_abs_diff_eq!(point.lat(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(point.lon(), 15.0, epsilon = 1e-6);
    }

    #[test]
    fn invalid_definition() {
        assert!(GeodesyProjection::<GeoPoint2d, Xy>::new("no_such_operator").is_none());
    }
}
