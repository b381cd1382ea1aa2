//! Values exchanged with the policy engine: geometries with their CRS and provenance metadata
//! ([`GeometryValue`]) and typed function arguments and results ([`Value`]).

use geo::CoordsIter;
use geo_types::Geometry;
use geopolicy_types::geo::Crs;

use crate::precision::Precision;

mod typed;

pub use typed::{Datatype, Value};

/// Identity of a context attribute (request, subject, resource or environment).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeDesignator {
    /// Attribute category identifier.
    pub category: String,
    /// Attribute identifier.
    pub attribute_id: String,
    /// Attribute issuer.
    pub issuer: Option<String>,
}

impl AttributeDesignator {
    /// Creates a designator without issuer.
    pub fn new(category: impl Into<String>, attribute_id: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            attribute_id: attribute_id.into(),
            issuer: None,
        }
    }
}

/// Where a geometry value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Written directly into the policy document.
    Policy,
    /// Retrieved from the evaluation context.
    Attribute(AttributeDesignator),
}

/// How the CRS of a geometry was stated when the value was supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CrsDeclaration {
    /// No explicit CRS metadata, the default CRS was assumed.
    #[default]
    Undeclared,
    /// Explicit signed SRID.
    Srid,
    /// Explicit SRS name, kept as given.
    Srs(String),
}

/// Geometry together with its coordinate reference system and the metadata that decides whether
/// it may be transformed into another CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryValue {
    geometry: Geometry<f64>,
    crs: Crs,
    precision: Precision,
    provenance: Provenance,
    allow_transformation: bool,
    crs_declaration: CrsDeclaration,
}

impl GeometryValue {
    /// Creates a policy-defined geometry that may not be transformed.
    pub fn new(geometry: impl Into<Geometry<f64>>, crs: Crs) -> Self {
        Self {
            geometry: geometry.into(),
            crs,
            precision: Precision::default(),
            provenance: Provenance::Policy,
            allow_transformation: false,
            crs_declaration: CrsDeclaration::default(),
        }
    }

    /// Creates a geometry retrieved from the given context attribute.
    pub fn from_attribute(
        geometry: impl Into<Geometry<f64>>,
        crs: Crs,
        attribute: AttributeDesignator,
    ) -> Self {
        Self::new(geometry, crs).with_provenance(Provenance::Attribute(attribute))
    }

    /// Sets the provenance.
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Sets whether the geometry may be reprojected into another CRS.
    pub fn with_allow_transformation(mut self, allow: bool) -> Self {
        self.allow_transformation = allow;
        self
    }

    /// Sets how the CRS was declared.
    pub fn with_crs_declaration(mut self, declaration: CrsDeclaration) -> Self {
        self.crs_declaration = declaration;
        self
    }

    /// Sets the precision model.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Geometry.
    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    /// Coordinate reference system of the geometry.
    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// Precision model of the coordinates.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Provenance.
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Whether the geometry may be reprojected into another CRS.
    pub fn allow_transformation(&self) -> bool {
        self.allow_transformation
    }

    /// How the CRS was declared.
    pub fn crs_declaration(&self) -> &CrsDeclaration {
        &self.crs_declaration
    }

    /// SRS name of the geometry: the declared one if there is one, `EPSG:<srid>` otherwise.
    pub fn srs_name(&self) -> String {
        match &self.crs_declaration {
            CrsDeclaration::Srs(name) => name.clone(),
            CrsDeclaration::Srid | CrsDeclaration::Undeclared => self.crs.srs_name(),
        }
    }

    /// Number of coordinates in the geometry.
    pub fn coordinate_count(&self) -> usize {
        self.geometry.coords_count()
    }

    /// Consumes the value and returns the geometry.
    pub fn into_geometry(self) -> Geometry<f64> {
        self.geometry
    }

    /// Creates a value with the same metadata but another geometry.
    pub(crate) fn derive(&self, geometry: Geometry<f64>) -> Self {
        Self {
            geometry,
            crs: self.crs,
            precision: self.precision,
            provenance: self.provenance.clone(),
            allow_transformation: self.allow_transformation,
            crs_declaration: self.crs_declaration.clone(),
        }
    }

    pub(crate) fn geometry_mut(&mut self) -> &mut Geometry<f64> {
        &mut self.geometry
    }

    pub(crate) fn set_crs(&mut self, crs: Crs) {
        self.crs = crs;
    }

    pub(crate) fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
    }

    pub(crate) fn revoke_transformation(&mut self) {
        self.allow_transformation = false;
    }
}
