//! Spatial policy functions.
//!
//! Every function has a stable identifier (URN), a fixed signature, and is evaluated with already
//! typed arguments. Functions comparing two geometries first bring them to a common precision
//! and CRS with [`ensure_precision`](crate::precision::ensure_precision) and
//! [`CrsReconciler`](crate::reconcile::CrsReconciler), and only then call the
//! [`GeometryKernel`].

use crate::error::GeoPolicyError;
use crate::kernel::GeometryKernel;
use crate::value::{Datatype, GeometryValue, Value};

mod bag;
mod registry;
mod spatial;

pub use bag::{BAG_FROM_COLLECTION, BAG_TO_COLLECTION};
pub use registry::FunctionRegistry;
pub use spatial::{
    AREA, DIMENSION, DISTANCE, EQUALS_DISTANCE, GEOMETRY_TYPE, IS_EMPTY, IS_SIMPLE,
    IS_WITHIN_DISTANCE, LENGTH, RELATE, SRID, SRID_EQUALS, SRS_EQUALS,
};

/// Common prefix of the function identifiers.
pub const FUNCTION_PREFIX: &str = "urn:ogc:def:function:geoxacml:3.0:geometry";

/// Parameter and return types of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Datatype of each positional parameter.
    pub parameters: &'static [Datatype],
    /// Datatype of the result.
    pub return_type: Datatype,
}

/// Function that can be called from a policy.
pub trait PolicyFunction: Send + Sync {
    /// Function identifier.
    fn id(&self) -> &'static str;

    /// Declared parameters and result type.
    fn signature(&self) -> FunctionSignature;

    /// Evaluates the function. Geometry arguments are consumed, so the caller must pass values
    /// that are not shared with other evaluations.
    fn evaluate(
        &self,
        kernel: &dyn GeometryKernel,
        args: Vec<Value>,
    ) -> Result<Value, GeoPolicyError>;
}

type FunctionBody = fn(&dyn GeometryKernel, Arguments) -> Result<Value, GeoPolicyError>;

/// [`PolicyFunction`] defined by an identifier, a signature and a body.
///
/// Arity and argument datatypes are checked against the signature before the body is called.
pub struct GeometryFunction {
    id: &'static str,
    signature: FunctionSignature,
    body: FunctionBody,
}

impl GeometryFunction {
    /// Creates a new function.
    pub const fn new(
        id: &'static str,
        parameters: &'static [Datatype],
        return_type: Datatype,
        body: FunctionBody,
    ) -> Self {
        Self {
            id,
            signature: FunctionSignature {
                parameters,
                return_type,
            },
            body,
        }
    }
}

impl PolicyFunction for GeometryFunction {
    fn id(&self) -> &'static str {
        self.id
    }

    fn signature(&self) -> FunctionSignature {
        self.signature
    }

    fn evaluate(
        &self,
        kernel: &dyn GeometryKernel,
        args: Vec<Value>,
    ) -> Result<Value, GeoPolicyError> {
        let args = Arguments::new(self.id, &self.signature, args)?;
        (self.body)(kernel, args)
    }
}

/// Arguments of a function call, checked against its signature and taken out one by one in
/// positional order.
#[derive(Debug)]
pub struct Arguments {
    function: &'static str,
    values: std::vec::IntoIter<Value>,
}

impl Arguments {
    /// Checks the number and datatypes of the values.
    ///
    /// A wrong number of arguments is [`GeoPolicyError::Arity`], a value of a wrong datatype is
    /// [`GeoPolicyError::Argument`].
    pub fn new(
        function: &'static str,
        signature: &FunctionSignature,
        values: Vec<Value>,
    ) -> Result<Self, GeoPolicyError> {
        if values.len() != signature.parameters.len() {
            return Err(GeoPolicyError::Arity {
                function,
                expected: signature.parameters.len(),
                actual: values.len(),
            });
        }

        for (index, (value, expected)) in values.iter().zip(signature.parameters).enumerate() {
            if value.datatype() != *expected {
                return Err(GeoPolicyError::Argument(format!(
                    "argument {} of {function} must be {expected} but is {}",
                    index + 1,
                    value.datatype()
                )));
            }
        }

        Ok(Self {
            function,
            values: values.into_iter(),
        })
    }

    /// Takes the next geometry.
    pub fn geometry(&mut self) -> Result<GeometryValue, GeoPolicyError> {
        match self.next()? {
            Value::Geometry(value) => Ok(value),
            other => Err(self.mismatch(Datatype::Geometry, &other)),
        }
    }

    /// Takes the next bag of geometries.
    pub fn bag(&mut self) -> Result<Vec<GeometryValue>, GeoPolicyError> {
        match self.next()? {
            Value::Bag(values) => Ok(values),
            other => Err(self.mismatch(Datatype::GeometryBag, &other)),
        }
    }

    /// Takes the next double.
    pub fn double(&mut self) -> Result<f64, GeoPolicyError> {
        match self.next()? {
            Value::Double(value) => Ok(value),
            other => Err(self.mismatch(Datatype::Double, &other)),
        }
    }

    /// Takes the next integer.
    pub fn integer(&mut self) -> Result<i64, GeoPolicyError> {
        match self.next()? {
            Value::Integer(value) => Ok(value),
            other => Err(self.mismatch(Datatype::Integer, &other)),
        }
    }

    /// Takes the next string.
    pub fn string(&mut self) -> Result<String, GeoPolicyError> {
        match self.next()? {
            Value::String(value) => Ok(value),
            other => Err(self.mismatch(Datatype::String, &other)),
        }
    }

    fn next(&mut self) -> Result<Value, GeoPolicyError> {
        self.values.next().ok_or_else(|| {
            GeoPolicyError::Argument(format!("not enough arguments for {}", self.function))
        })
    }

    fn mismatch(&self, expected: Datatype, actual: &Value) -> GeoPolicyError {
        GeoPolicyError::Argument(format!(
            "{} expected {expected} but got {}",
            self.function,
            actual.datatype()
        ))
    }
}

/// All functions of this crate.
pub fn standard_functions() -> Vec<GeometryFunction> {
    spatial::functions().into_iter().chain(bag::functions()).collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geo_types::point;
    use geopolicy_types::geo::Crs;

    use super::*;

    const SIGNATURE: FunctionSignature = FunctionSignature {
        parameters: &[Datatype::Geometry, Datatype::Double],
        return_type: Datatype::Boolean,
    };

    fn geometry() -> Value {
        GeometryValue::new(point!(x: 1.0, y: 2.0), Crs::EPSG3857).into()
    }

    #[test]
    fn arguments_in_order() {
        let mut args = Arguments::new("f", &SIGNATURE, vec![geometry(), 2.5.into()])
            .expect("valid arguments");

        assert_eq!(args.geometry().expect("geometry").crs(), Crs::EPSG3857);
        assert_eq!(args.double().expect("double"), 2.5);
        assert_matches!(args.double(), Err(GeoPolicyError::Argument(_)));
    }

    #[test]
    fn wrong_arity() {
        assert_matches!(
            Arguments::new("f", &SIGNATURE, vec![geometry()]),
            Err(GeoPolicyError::Arity {
                function: "f",
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn wrong_datatype() {
        assert_matches!(
            Arguments::new("f", &SIGNATURE, vec![geometry(), 2i64.into()]),
            Err(GeoPolicyError::Argument(_))
        );
    }

    #[test]
    fn identifiers_share_prefix() {
        let functions = standard_functions();
        assert_eq!(functions.len(), 15);
        assert!(functions.iter().all(|f| f.id().starts_with(FUNCTION_PREFIX)));
    }
}
