use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::marker::PhantomData;

use crate::cartesian::NewCartesianPoint2d;
use crate::geo::datum::Datum;
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::Projection;

/// Spherical Web Mercator projection (EPSG:3857).
///
/// The sphere radius is the semi-major axis of the datum. Latitudes outside of `(-90, 90)` cannot
/// be projected.
#[derive(Debug, Copy, Clone)]
pub struct WebMercator<In, Out> {
    radius: f64,
    points: PhantomData<(In, Out)>,
}

impl<In, Out> WebMercator<In, Out> {
    /// Creates a new instance for the datum.
    pub fn new(datum: Datum) -> Self {
        Self {
            radius: datum.semimajor(),
            points: PhantomData,
        }
    }
}

impl<In, Out> Default for WebMercator<In, Out> {
    fn default() -> Self {
        Self::new(Datum::WGS84)
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection for WebMercator<In, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let projected = Out::new(
            self.radius * input.lon_rad(),
            self.radius * (FRAC_PI_4 + input.lat_rad() / 2.0).tan().ln(),
        );
        projected.is_finite().then_some(projected)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let lat = FRAC_PI_2 - 2.0 * (-input.y() / self.radius).exp().atan();
        let lon = input.x() / self.radius;

        (lat.is_finite() && lon.is_finite())
            .then(|| In::latlon(lat.to_degrees(), lon.to_degrees()))
    }
}
