use kunai_rfc::rfc::dav::core::{Depth, QName};
use thiserror::Error;

/// Engine-level errors.
///
/// These are fatal to the whole request and surface as a 500-class
/// response. Per-property and per-resource failures are not errors;
/// they are recorded as outcomes in the response instead.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unsupported depth: {0}")]
    UnsupportedDepth(Depth),

    #[error("Unsupported PROPFIND request shape: {0}")]
    UnsupportedPropfind(&'static str),

    #[error("Property {0} is not writable")]
    PropertyNotWritable(QName),

    #[error("Resource is not a collection")]
    NotACollection,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error(transparent)]
    Rfc(#[from] kunai_rfc::error::RfcError),

    #[error(transparent)]
    Core(#[from] kunai_core::error::CoreError),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
