//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeoPolicyTypesError {
    /// SRS string does not follow `EPSG:<code>` and does not name WGS84/CRS84.
    #[error("invalid SRS '{srs}': {reason}")]
    InvalidSrs {
        /// The string that failed to parse.
        srs: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}
