//! Error types used by the crate.

use geopolicy_types::error::GeoPolicyTypesError;
use thiserror::Error;

use crate::kernel::KernelError;
use crate::value::AttributeDesignator;

/// Status reported to the policy engine together with an [`GeoPolicyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// The function could not be evaluated with the given arguments.
    ProcessingError,
    /// The policy itself is defective.
    SyntaxError,
    /// An attribute must be supplied differently by the requester.
    MissingAttribute,
}

impl StatusCode {
    /// XACML status code identifier.
    pub fn urn(&self) -> &'static str {
        match self {
            StatusCode::ProcessingError => "urn:oasis:names:tc:xacml:1.0:status:processing-error",
            StatusCode::SyntaxError => "urn:oasis:names:tc:xacml:1.0:status:syntax-error",
            StatusCode::MissingAttribute => "urn:oasis:names:tc:xacml:1.0:status:missing-attribute",
        }
    }
}

/// Metadata an attribute value must carry for the evaluation to succeed.
///
/// `srid` and `srs` are never both set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeValueDescriptor {
    /// Signed SRID the geometry must be encoded in.
    pub srid: Option<i64>,
    /// SRS name the geometry must be encoded in.
    pub srs: Option<String>,
    /// Required value of the transformation permission.
    pub allow_transformation: Option<bool>,
}

/// Describes which context attribute the requester must supply, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAttributeDetail {
    /// Identity of the attribute the offending geometry was retrieved from, `None` for a geometry
    /// written into the policy.
    pub attribute: Option<AttributeDesignator>,
    /// Datatype identifier of the attribute.
    pub data_type: &'static str,
    /// Metadata the attribute value must have.
    pub expected: AttributeValueDescriptor,
}

/// Error of a policy function evaluation.
#[derive(Debug, Error)]
pub enum GeoPolicyError {
    /// Function is called with a wrong number of arguments.
    #[error("function {function} requires exactly {expected} arguments but given {actual}")]
    Arity {
        /// Function identifier.
        function: &'static str,
        /// Declared number of parameters.
        expected: usize,
        /// Number of arguments given.
        actual: usize,
    },
    /// Argument of a wrong type or with invalid content.
    #[error("invalid argument: {0}")]
    Argument(String),
    /// No function is registered with the identifier.
    #[error("unknown function {0}")]
    UnknownFunction(String),
    /// Geometries defined in the policy cannot be brought to a common CRS.
    #[error("CRS transformation prohibited: {0}")]
    PolicyDefect(String),
    /// An attribute geometry may not be transformed. The detail tells how to supply it instead.
    #[error("{message}")]
    CrsTransformDenied {
        /// Human readable reason.
        message: &'static str,
        /// What the requester has to change.
        detail: Box<MissingAttributeDetail>,
    },
    /// Failure of the geometry kernel.
    #[error("geometry computation failed: {0}")]
    Kernel(#[from] KernelError),
}

impl GeoPolicyError {
    /// Status to report to the policy engine.
    pub fn status(&self) -> StatusCode {
        match self {
            GeoPolicyError::PolicyDefect(_) => StatusCode::SyntaxError,
            GeoPolicyError::CrsTransformDenied { .. } => StatusCode::MissingAttribute,
            GeoPolicyError::Arity { .. }
            | GeoPolicyError::Argument(_)
            | GeoPolicyError::UnknownFunction(_)
            | GeoPolicyError::Kernel(_) => StatusCode::ProcessingError,
        }
    }

    /// Remediation detail, if the error can be fixed by the requester.
    pub fn missing_attribute(&self) -> Option<&MissingAttributeDetail> {
        match self {
            GeoPolicyError::CrsTransformDenied { detail, .. } => Some(detail.as_ref()),
            _ => None,
        }
    }
}

impl From<GeoPolicyTypesError> for GeoPolicyError {
    fn from(value: GeoPolicyTypesError) -> Self {
        Self::Argument(value.to_string())
    }
}
