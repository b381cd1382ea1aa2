use std::sync::Arc;

use ahash::HashMap;

use super::{standard_functions, PolicyFunction};
use crate::error::GeoPolicyError;
use crate::kernel::{GeoKernel, GeometryKernel};
use crate::value::Value;

/// Set of policy functions addressed by their identifiers.
///
/// The registry is immutable after construction and can be shared between threads evaluating
/// independent requests.
///
/// ```
/// use geo_types::point;
/// use geopolicy::function::{FunctionRegistry, SRID};
/// use geopolicy::value::{GeometryValue, Value};
/// use geopolicy_types::geo::Crs;
///
/// let registry = FunctionRegistry::default();
/// let location = GeometryValue::new(point!(x: 13.4, y: 52.5), Crs::CRS84);
/// let srid = registry.evaluate(SRID, vec![location.into()]).unwrap();
/// assert_eq!(srid, Value::Integer(-4326));
/// ```
pub struct FunctionRegistry {
    kernel: Arc<dyn GeometryKernel>,
    functions: HashMap<&'static str, Box<dyn PolicyFunction>>,
}

impl FunctionRegistry {
    /// Registry with all functions of this crate, computing with the given kernel.
    pub fn new(kernel: Arc<dyn GeometryKernel>) -> Self {
        standard_functions()
            .into_iter()
            .fold(Self::empty(kernel), |registry, function| {
                registry.with_function(function)
            })
    }

    /// Registry without functions.
    pub fn empty(kernel: Arc<dyn GeometryKernel>) -> Self {
        Self {
            kernel,
            functions: HashMap::default(),
        }
    }

    /// Adds the function, replacing a function with the same identifier.
    pub fn with_function(mut self, function: impl PolicyFunction + 'static) -> Self {
        self.functions.insert(function.id(), Box::new(function));
        self
    }

    /// Kernel the functions compute with.
    pub fn kernel(&self) -> &dyn GeometryKernel {
        self.kernel.as_ref()
    }

    /// Returns the function with the identifier.
    pub fn get(&self, id: &str) -> Option<&dyn PolicyFunction> {
        self.functions.get(id).map(|function| function.as_ref())
    }

    /// Identifiers of all registered functions.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }

    /// Evaluates the function with the identifier.
    pub fn evaluate(&self, id: &str, args: Vec<Value>) -> Result<Value, GeoPolicyError> {
        let Some(function) = self.get(id) else {
            return Err(GeoPolicyError::UnknownFunction(id.to_string()));
        };

        log::trace!("Evaluating {id} with {} arguments", args.len());
        function.evaluate(self.kernel(), args)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new(Arc::new(GeoKernel::new()))
    }
}
