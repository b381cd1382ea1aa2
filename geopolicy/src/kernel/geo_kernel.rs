use std::cell::Cell;

use ahash::HashMap;
use geo::dimensions::HasDimensions;
use geo::{Area, MapCoordsInPlace, Relate};
use geo_types::{Coord, Geometry};
use geopolicy_types::geo::{ChainProjection, InvertedProjection, Projection, ProjectionType};

use super::measure;
use super::relate::RelatePattern;
use super::{GeometryKernel, KernelError};

type CoordProjection = Box<dyn Projection<InPoint = Coord<f64>, OutPoint = Coord<f64>>>;

/// Projection definition for an EPSG code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionConfig {
    /// EPSG code.
    pub code: u32,
    /// `geodesy` operator definition projecting geographic coordinates into the CRS, e.g.
    /// `tmerc lat_0=0 lon_0=9 k_0=0.9996 x_0=500000`.
    pub definition: String,
}

/// Configuration of [`GeoKernel`].
///
/// ```
/// use geopolicy::kernel::{GeoKernel, KernelConfig};
///
/// let config: KernelConfig = serde_json::from_str(
///     r#"{ "projections": [{ "code": 25832, "definition": "utm zone=32" }] }"#,
/// ).unwrap();
/// let kernel = GeoKernel::from_config(&config);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KernelConfig {
    /// Projections in addition to (or replacing) the built-in ones.
    #[cfg_attr(feature = "serde", serde(default))]
    pub projections: Vec<ProjectionConfig>,
}

/// [`GeometryKernel`] implemented with the `geo` crate.
///
/// Reprojection goes through geographic coordinates: the source coordinates are unprojected and
/// then projected into the target CRS. EPSG:4326, Web Mercator and WGS84 UTM zones are known out
/// of the box, other codes can be added with [`GeoKernelBuilder`].
#[derive(Debug, Clone, Default)]
pub struct GeoKernel {
    projections: HashMap<u32, ProjectionType>,
}

impl GeoKernel {
    /// Kernel with the built-in projections only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder.
    pub fn builder() -> GeoKernelBuilder {
        GeoKernelBuilder::default()
    }

    /// Creates a kernel from configuration.
    pub fn from_config(config: &KernelConfig) -> Self {
        config
            .projections
            .iter()
            .fold(Self::builder(), |builder, projection| {
                builder.with_definition(projection.code, projection.definition.clone())
            })
            .build()
    }

    fn projection_type(&self, code: u32) -> Result<ProjectionType, KernelError> {
        self.projections
            .get(&code)
            .cloned()
            .or_else(|| ProjectionType::for_code(code))
            .ok_or(KernelError::UnsupportedCrs(code))
    }

    fn projection(&self, code: u32) -> Result<CoordProjection, KernelError> {
        self.projection_type(code)?
            .get_projection()
            .ok_or(KernelError::UnsupportedCrs(code))
    }
}

impl GeometryKernel for GeoKernel {
    fn length(&self, geometry: &Geometry<f64>) -> f64 {
        measure::length(geometry)
    }

    fn area(&self, geometry: &Geometry<f64>) -> f64 {
        geometry.unsigned_area()
    }

    fn dimension(&self, geometry: &Geometry<f64>) -> i64 {
        measure::dimension(geometry)
    }

    fn geometry_type(&self, geometry: &Geometry<f64>) -> &'static str {
        measure::type_name(geometry)
    }

    fn is_simple(&self, geometry: &Geometry<f64>) -> bool {
        measure::is_simple(geometry)
    }

    fn is_empty(&self, geometry: &Geometry<f64>) -> bool {
        geometry.is_empty()
    }

    fn distance(&self, a: &Geometry<f64>, b: &Geometry<f64>) -> Result<f64, KernelError> {
        measure::distance(a, b)
    }

    fn relate(
        &self,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
        pattern: &RelatePattern,
    ) -> Result<bool, KernelError> {
        measure::ensure_finite(a)?;
        measure::ensure_finite(b)?;
        Ok(pattern.matches(&a.relate(b)))
    }

    fn reproject(
        &self,
        geometry: &mut Geometry<f64>,
        from: u32,
        to: u32,
    ) -> Result<(), KernelError> {
        if from == to {
            return Ok(());
        }

        let projection = ChainProjection::new(
            InvertedProjection::new(self.projection(from)?),
            self.projection(to)?,
        );

        let failure: Cell<Option<KernelError>> = Cell::new(None);
        geometry.map_coords_in_place(|c| match projection.project(&c) {
            Some(projected) => projected,
            None => {
                let first = failure.take().unwrap_or(KernelError::Projection {
                    from,
                    to,
                    x: c.x,
                    y: c.y,
                });
                failure.set(Some(first));
                c
            }
        });

        match failure.into_inner() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Builder for [`GeoKernel`].
#[derive(Debug, Default)]
pub struct GeoKernelBuilder {
    projections: HashMap<u32, ProjectionType>,
}

impl GeoKernelBuilder {
    /// Sets the projection type of the code, replacing the built-in one.
    pub fn with_projection(mut self, code: u32, projection: ProjectionType) -> Self {
        self.projections.insert(code, projection);
        self
    }

    /// Sets a `geodesy` operator definition for the code.
    pub fn with_definition(self, code: u32, definition: impl Into<String>) -> Self {
        self.with_projection(code, ProjectionType::Other(definition.into()))
    }

    /// Creates the kernel.
    pub fn build(self) -> GeoKernel {
        GeoKernel {
            projections: self.projections,
        }
    }
}
