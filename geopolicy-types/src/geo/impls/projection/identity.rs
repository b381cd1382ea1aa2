use std::marker::PhantomData;

use crate::cartesian::NewCartesianPoint2d;
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::Projection;

/// Projection of a geographic CRS onto itself: longitude becomes `x`, latitude becomes `y`.
pub struct IdentityProjection<In, Out> {
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> IdentityProjection<In, Out> {
    /// Creates a new instance.
    pub fn new() -> Self {
        Self {
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }
}

impl<In, Out> Default for IdentityProjection<In, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In: NewGeoPoint, Out: NewCartesianPoint2d> Projection for IdentityProjection<In, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        Some(Out::new(input.lon(), input.lat()))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        Some(In::latlon(input.y(), input.x()))
    }
}
