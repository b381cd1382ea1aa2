use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::cartesian::NewCartesianPoint2d;
use crate::error::GeoPolicyTypesError;
use crate::geo::datum::Datum;
use crate::geo::impls::projection::{IdentityProjection, WebMercator};
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::Projection;

/// EPSG code of the geodetic CRS whose axis order is used inconsistently in the wild.
const AMBIGUOUS_GEODETIC_CODE: u32 = 4326;

/// Order of the two ordinates of a coordinate relative to the order defined by the CRS registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisOrder {
    /// Axis order as defined by the registry (latitude first for EPSG:4326).
    #[default]
    Native,
    /// The two ordinates are exchanged (longitude first for EPSG:4326, also known as CRS84).
    Swapped,
}

impl AxisOrder {
    /// Returns the opposite axis order.
    pub fn flipped(self) -> Self {
        match self {
            AxisOrder::Native => AxisOrder::Swapped,
            AxisOrder::Swapped => AxisOrder::Native,
        }
    }
}

/// Coordinate reference system of a geometry: a registry (EPSG) code plus the order of the axis.
///
/// Policy engines traditionally encode this as a signed SRID where a negative value means the same
/// code with swapped axis. [`Crs::from_srid`] and [`Crs::srid`] convert from and into that
/// encoding, but inside the crate the two parts are always kept apart.
///
/// ```
/// use geopolicy_types::geo::{AxisOrder, Crs};
///
/// let crs84 = Crs::from_srid(-4326);
/// assert_eq!(crs84, Crs::CRS84);
/// assert_eq!(crs84.axis_order(), AxisOrder::Swapped);
/// assert!(crs84.is_axis_swap_of(&Crs::EPSG4326));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crs {
    code: u32,
    axis_order: AxisOrder,
}

impl Crs {
    /// EPSG:4326 with latitude/longitude axis order.
    pub const EPSG4326: Crs = Crs::new(AMBIGUOUS_GEODETIC_CODE);

    /// EPSG:4326 with longitude/latitude axis order (OGC CRS84, the GeoJSON default).
    pub const CRS84: Crs = Crs::with_axis_order(AMBIGUOUS_GEODETIC_CODE, AxisOrder::Swapped);

    /// Web Mercator projection.
    pub const EPSG3857: Crs = Crs::new(3857);

    /// Creates a CRS with the registry's native axis order.
    pub const fn new(code: u32) -> Self {
        Self {
            code,
            axis_order: AxisOrder::Native,
        }
    }

    /// Creates a CRS with the given axis order.
    pub const fn with_axis_order(code: u32, axis_order: AxisOrder) -> Self {
        Self { code, axis_order }
    }

    /// Decodes a signed SRID. A negative value is the same code with swapped axis.
    pub fn from_srid(srid: i32) -> Self {
        let axis_order = if srid < 0 {
            AxisOrder::Swapped
        } else {
            AxisOrder::Native
        };

        Self {
            code: srid.unsigned_abs(),
            axis_order,
        }
    }

    /// Encodes the CRS as a signed SRID.
    pub fn srid(&self) -> i64 {
        match self.axis_order {
            AxisOrder::Native => i64::from(self.code),
            AxisOrder::Swapped => -i64::from(self.code),
        }
    }

    /// Registry code.
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Axis order.
    pub fn axis_order(&self) -> AxisOrder {
        self.axis_order
    }

    /// Same code with the opposite axis order.
    pub fn axis_swapped(&self) -> Self {
        Self {
            code: self.code,
            axis_order: self.axis_order.flipped(),
        }
    }

    /// Returns true if the two CRS differ only in the axis order.
    pub fn is_axis_swap_of(&self, other: &Crs) -> bool {
        self.code == other.code && self.axis_order != other.axis_order
    }

    /// Returns true for EPSG:4326 in either axis order.
    pub fn is_ambiguous_geodetic(&self) -> bool {
        self.code == AMBIGUOUS_GEODETIC_CODE
    }

    /// Returns true if the first ordinate of a coordinate in this CRS is the northing (latitude).
    ///
    /// Projections always work with the easting (longitude) first, so coordinates in such a CRS
    /// must be swapped before and after projecting.
    pub fn is_northing_first(&self) -> bool {
        let registry_northing_first = self.is_ambiguous_geodetic();
        match self.axis_order {
            AxisOrder::Native => registry_northing_first,
            AxisOrder::Swapped => !registry_northing_first,
        }
    }

    /// Name of the CRS in `EPSG:<srid>` form, using the signed SRID.
    pub fn srs_name(&self) -> String {
        format!("EPSG:{}", self.srid())
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::CRS84
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.srs_name())
    }
}

impl FromStr for Crs {
    type Err = GeoPolicyTypesError;

    /// Parses `EPSG:<code>` (authority is case-insensitive, a negative code means swapped axis).
    /// Any string containing `WGS84` or `CRS84` (case-insensitive) is [`Crs::CRS84`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        if upper.contains("WGS84") || upper.contains("CRS84") {
            return Ok(Crs::CRS84);
        }

        let invalid = |reason| GeoPolicyTypesError::InvalidSrs {
            srs: s.to_string(),
            reason,
        };

        let mut tokens = s.split(':');
        let (Some(authority), Some(code), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(invalid("SRS pattern is EPSG:<srid>"));
        };

        if !authority.eq_ignore_ascii_case("EPSG") {
            return Err(invalid("SRS must start with authority string 'EPSG'"));
        }

        let srid: i32 = code
            .parse()
            .map_err(|_| invalid("SRS code must be an integer"))?;

        Ok(Crs::from_srid(srid))
    }
}

/// Describes how coordinates of a CRS are obtained from geographic coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ProjectionType {
    /// Geographic coordinates, no projection.
    None,
    /// Spherical Web Mercator on the WGS84 datum.
    WebMercator,
    /// Projection described by a `geodesy` operator definition, e.g. `utm zone=32`.
    Other(String),
}

impl ProjectionType {
    /// Returns the projection type of the EPSG codes known without configuration.
    pub fn for_code(code: u32) -> Option<Self> {
        match code {
            AMBIGUOUS_GEODETIC_CODE => Some(Self::None),
            3857 | 900913 => Some(Self::WebMercator),
            32601..=32660 => Some(Self::Other(format!("utm zone={}", code - 32600))),
            32701..=32760 => Some(Self::Other(format!("utm zone={} south", code - 32700))),
            _ => None,
        }
    }

    /// Creates the projection from geographic coordinates. Returns `None` if the definition is not
    /// understood or the `geodesy` feature is disabled.
    pub fn get_projection<In, Out>(
        &self,
    ) -> Option<Box<dyn Projection<InPoint = In, OutPoint = Out>>>
    where
        In: NewGeoPoint + 'static,
        Out: NewCartesianPoint2d + 'static,
    {
        match self {
            ProjectionType::None => Some(Box::new(IdentityProjection::new())),
            ProjectionType::WebMercator => Some(Box::new(WebMercator::new(Datum::WGS84))),
            #[cfg(feature = "geodesy")]
            ProjectionType::Other(definition) => Some(Box::new(
                crate::geo::impls::projection::GeodesyProjection::new(definition)?,
            )),
            #[cfg(not(feature = "geodesy"))]
            ProjectionType::Other(_) => None,
        }
    }
}
