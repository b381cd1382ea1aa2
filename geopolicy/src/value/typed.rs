use std::fmt::{Display, Formatter};

use super::GeometryValue;

/// Datatype of a function parameter or result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    /// `xs:double`
    Double,
    /// `xs:integer`
    Integer,
    /// `xs:string`
    String,
    /// `xs:boolean`
    Boolean,
    /// Single geometry.
    Geometry,
    /// Bag of geometries.
    GeometryBag,
}

impl Datatype {
    /// Datatype identifier. A bag is identified by the datatype of its elements.
    pub fn urn(&self) -> &'static str {
        match self {
            Datatype::Double => "http://www.w3.org/2001/XMLSchema#double",
            Datatype::Integer => "http://www.w3.org/2001/XMLSchema#integer",
            Datatype::String => "http://www.w3.org/2001/XMLSchema#string",
            Datatype::Boolean => "http://www.w3.org/2001/XMLSchema#boolean",
            Datatype::Geometry | Datatype::GeometryBag => {
                "urn:ogc:def:geoxacml:3.0:data-type:geometry"
            }
        }
    }
}

impl Display for Datatype {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Datatype::GeometryBag => write!(f, "bag<{}>", self.urn()),
            _ => write!(f, "{}", self.urn()),
        }
    }
}

/// Typed value passed into or returned from a policy function.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Double.
    Double(f64),
    /// Integer.
    Integer(i64),
    /// String.
    String(String),
    /// Boolean.
    Boolean(bool),
    /// Geometry.
    Geometry(GeometryValue),
    /// Bag of geometries. Order is preserved.
    Bag(Vec<GeometryValue>),
}

impl Value {
    /// Datatype of the value.
    pub fn datatype(&self) -> Datatype {
        match self {
            Value::Double(_) => Datatype::Double,
            Value::Integer(_) => Datatype::Integer,
            Value::String(_) => Datatype::String,
            Value::Boolean(_) => Datatype::Boolean,
            Value::Geometry(_) => Datatype::Geometry,
            Value::Bag(_) => Datatype::GeometryBag,
        }
    }

    /// Returns the boolean, if the value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the double, if the value is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer, if the value is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string, if the value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the geometry, if the value is one.
    pub fn as_geometry(&self) -> Option<&GeometryValue> {
        match self {
            Value::Geometry(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the bag, if the value is one.
    pub fn as_bag(&self) -> Option<&[GeometryValue]> {
        match self {
            Value::Bag(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<GeometryValue> for Value {
    fn from(value: GeometryValue) -> Self {
        Self::Geometry(value)
    }
}

impl From<Vec<GeometryValue>> for Value {
    fn from(value: Vec<GeometryValue>) -> Self {
        Self::Bag(value)
    }
}
