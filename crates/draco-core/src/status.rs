//! Status codes and errors reported by the engine.
//!
//! Codes mirror the Draco `Status::Code` values so they can be forwarded
//! verbatim across the C API.

use std::fmt;

use thiserror::Error;

/// Numeric status codes shared with the C API. `Ok` is zero, failures are
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    #[default]
    Ok = 0,
    DracoError = -1,
    IoError = -2,
    InvalidParameter = -3,
    UnsupportedVersion = -4,
    UnknownVersion = -5,
    UnsupportedFeature = -6,
}

impl ErrorCode {
    pub const fn name(self) -> &'static str {
        match self {
            ErrorCode::Ok => "OK",
            ErrorCode::DracoError => "DRACO_ERROR",
            ErrorCode::IoError => "IO_ERROR",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::UnknownVersion => "UNKNOWN_VERSION",
            ErrorCode::UnsupportedFeature => "UNSUPPORTED_FEATURE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DracoError {
    #[error("General error: {0}")]
    DracoError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),
    #[error("Unknown version: {0}")]
    UnknownVersion(String),
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),
}

impl DracoError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DracoError::DracoError(_) => ErrorCode::DracoError,
            DracoError::IoError(_) => ErrorCode::IoError,
            DracoError::InvalidParameter(_) => ErrorCode::InvalidParameter,
            DracoError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            DracoError::UnknownVersion(_) => ErrorCode::UnknownVersion,
            DracoError::UnsupportedFeature(_) => ErrorCode::UnsupportedFeature,
        }
    }

    /// The bare message, without the code prefix added by `Display`.
    pub fn message(&self) -> &str {
        match self {
            DracoError::DracoError(msg)
            | DracoError::IoError(msg)
            | DracoError::InvalidParameter(msg)
            | DracoError::UnsupportedVersion(msg)
            | DracoError::UnknownVersion(msg)
            | DracoError::UnsupportedFeature(msg) => msg,
        }
    }
}

pub type Status = Result<(), DracoError>;

pub type StatusOr<T> = Result<T, DracoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_draco() {
        assert_eq!(DracoError::IoError("x".into()).code() as i32, -2);
        assert_eq!(DracoError::UnsupportedFeature("x".into()).code() as i32, -6);
        assert_eq!(ErrorCode::Ok as i32, 0);
    }

    #[test]
    fn message_is_unprefixed() {
        let err = DracoError::IoError("Failed to parse Draco header.".into());
        assert_eq!(err.message(), "Failed to parse Draco header.");
        assert_eq!(err.to_string(), "IO error: Failed to parse Draco header.");
    }
}
