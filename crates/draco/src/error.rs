//! Errors of the typed layer and translation of native status objects.

use std::os::raw::c_char;
use std::ptr::NonNull;

use draco_core::c_api::{
    draco_status_code, draco_status_error_msg, draco_status_error_msg_length, draco_status_free,
    draco_status_ok, draco_status_t,
};
use thiserror::Error;

use crate::registry::{AttributeRole, GeometryType};

/// Errors reported by the Draco wrappers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A decode or encode call returned a non-ok status. `code` is the
    /// native status code, forwarded verbatim.
    #[error("draco: [{code}] {message}")]
    Codec { code: i32, message: String },
    #[error("unsupported attribute shape: {components} components")]
    UnsupportedShape { components: usize },
    #[error("expected {expected} attribute values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("attribute count must be greater than zero")]
    ZeroCount,
    #[error("native handle already released")]
    Released,
    #[error("cannot decode into geometry type {0:?}")]
    InvalidGeometryType(GeometryType),
    #[error("builder rejected the {role:?} attribute")]
    AttributeRejected { role: AttributeRole },
    #[error("builder was not started")]
    NotStarted,
}

impl Error {
    /// Native status code for codec failures.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Codec { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Owns a status object returned by the engine and frees it on drop.
pub(crate) struct NativeStatus(NonNull<draco_status_t>);

impl NativeStatus {
    /// Takes ownership of `raw`.
    ///
    /// # Safety
    /// `raw` must be null or a status returned by the engine that nothing
    /// else frees.
    pub(crate) unsafe fn from_raw(raw: *mut draco_status_t) -> Option<Self> {
        NonNull::new(raw).map(NativeStatus)
    }

    fn message(&self) -> String {
        let status = self.0.as_ptr();
        // Length includes the NUL terminator.
        let len = unsafe { draco_status_error_msg_length(status) };
        if len <= 1 {
            return String::new();
        }
        let mut buf = vec![0u8; len];
        let written = unsafe { draco_status_error_msg(status, buf.as_mut_ptr().cast::<c_char>(), len) };
        buf.truncate(written.saturating_sub(1));
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub(crate) fn into_result(self) -> Result<(), Error> {
        let status = self.0.as_ptr();
        if unsafe { draco_status_ok(status) } {
            return Ok(());
        }
        Err(Error::Codec {
            code: unsafe { draco_status_code(status) },
            message: self.message(),
        })
    }
}

impl Drop for NativeStatus {
    fn drop(&mut self) {
        unsafe { draco_status_free(self.0.as_ptr()) };
    }
}

/// Converts a status returned by the engine into a result, freeing it.
///
/// # Safety
/// Same contract as [`NativeStatus::from_raw`].
pub(crate) unsafe fn check_status(raw: *mut draco_status_t) -> Result<(), Error> {
    match NativeStatus::from_raw(raw) {
        Some(status) => status.into_result(),
        None => Err(Error::Codec {
            code: -1,
            message: "missing status".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draco_core::c_api::{draco_decoder_decode_mesh, draco_decoder_free, draco_mesh_free, draco_new_decoder, draco_new_mesh};

    fn decode_status(data: &[u8]) -> *mut draco_status_t {
        unsafe {
            let decoder = draco_new_decoder();
            let mesh = draco_new_mesh();
            let status = draco_decoder_decode_mesh(decoder, data.as_ptr().cast(), data.len(), mesh);
            draco_mesh_free(mesh);
            draco_decoder_free(decoder);
            status
        }
    }

    #[test]
    fn translates_header_failure() {
        let err = unsafe { check_status(decode_status(&[1, 2, 3])) }.unwrap_err();
        assert_eq!(
            err,
            Error::Codec {
                code: -2,
                message: "Failed to parse Draco header.".to_string()
            }
        );
        assert_eq!(err.code(), Some(-2));
        assert_eq!(err.to_string(), "draco: [-2] Failed to parse Draco header.");
    }

    #[test]
    fn wrong_magic_keeps_code() {
        let err = unsafe { check_status(decode_status(b"DRECO\x02\x02\x01\x00\x00\x00")) }.unwrap_err();
        assert_eq!(err.code(), Some(-1));
        assert!(matches!(err, Error::Codec { ref message, .. } if message == "Not a Draco file."));
    }

    #[test]
    fn ok_status_has_an_empty_message() {
        // Empty point cloud: header, zero points, no attribute encoders.
        let mut blob = b"DRACO\x02\x03\x00\x00\x00\x00".to_vec();
        blob.extend_from_slice(&[0, 0, 0, 0, 0]);
        let status = unsafe { NativeStatus::from_raw(decode_status(&blob)) }.unwrap();
        assert_eq!(status.message(), "");
        assert_eq!(status.into_result(), Ok(()));
    }

    #[test]
    fn missing_status_is_an_error() {
        assert!(unsafe { check_status(std::ptr::null_mut()) }.is_err());
        assert_eq!(Error::Released.code(), None);
    }
}
