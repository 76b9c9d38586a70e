use std::os::raw::{c_char, c_int};
use std::ptr;

use draco_core::c_api::{
    draco_buffer_free, draco_encoder_encode_mesh, draco_encoder_encode_point_cloud,
    draco_encoder_set_attribute_quantization, draco_encoder_t, draco_new_encoder, draco_status_t,
};
use log::debug;

use crate::error::{check_status, Error};
use crate::handle::Handle;
use crate::mesh::Mesh;
use crate::point_cloud::Geometry;
use crate::registry::AttributeRole;

/// An encode output allocated by the engine, freed on drop.
struct NativeBuffer {
    data: *mut c_char,
    size: usize,
}

impl NativeBuffer {
    fn empty() -> Self {
        NativeBuffer {
            data: ptr::null_mut(),
            size: 0,
        }
    }

    fn to_vec(&self) -> Vec<u8> {
        if self.data.is_null() || self.size == 0 {
            return Vec::new();
        }
        unsafe { std::slice::from_raw_parts(self.data.cast::<u8>(), self.size) }.to_vec()
    }
}

impl Drop for NativeBuffer {
    fn drop(&mut self) {
        unsafe { draco_buffer_free(self.data, self.size) };
    }
}

/// Encodes point clouds and meshes into Draco blobs.
///
/// Holds only configuration; the same encoder may be used for any number
/// of geometries.
pub struct Encoder {
    handle: Handle<draco_encoder_t>,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            handle: Handle::from_raw(draco_new_encoder()),
        }
    }

    /// Quantizes float attributes with `role` to `bits` bits. Zero turns
    /// quantization off; depths outside 1..=30 make later encodes fail.
    pub fn set_attribute_quantization(&mut self, role: AttributeRole, bits: i32) {
        unsafe { draco_encoder_set_attribute_quantization(self.handle.as_ptr(), role.native_tag(), bits as c_int) };
    }

    /// Encodes a mesh with its faces. On failure any partial output of the
    /// engine is freed and discarded.
    pub fn encode_mesh(&self, mesh: &Mesh) -> Result<Vec<u8>, Error> {
        let encoder = self.handle.live()?;
        let geometry = mesh.live_raw()?;
        self.run(|data, size| unsafe { draco_encoder_encode_mesh(encoder, geometry, data, size) })
    }

    /// Encodes the points and attributes of any geometry. Faces of a mesh
    /// are left out. On failure any partial output is discarded.
    pub fn encode_point_cloud<G: Geometry>(&self, geometry: &G) -> Result<Vec<u8>, Error> {
        let encoder = self.handle.live()?;
        let geometry = geometry.live_raw()?;
        self.run(|data, size| unsafe { draco_encoder_encode_point_cloud(encoder, geometry, data, size) })
    }

    fn run<F>(&self, encode: F) -> Result<Vec<u8>, Error>
    where
        F: FnOnce(*mut *mut c_char, *mut usize) -> *mut draco_status_t,
    {
        let mut output = NativeBuffer::empty();
        let status = encode(&mut output.data, &mut output.size);
        unsafe { check_status(status) }?;
        debug!("encoded {} bytes", output.size);
        Ok(output.to_vec())
    }

    pub fn release(&mut self) {
        self.handle.release();
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PointCloudBuilder;
    use crate::point_cloud::PointCloud;

    fn points() -> PointCloud {
        let mut builder = PointCloudBuilder::new();
        builder.start(2);
        builder
            .set_attribute(2, &[[0.25f32, 0.5, 1.0], [2.0, 4.0, 8.0]], AttributeRole::Position)
            .unwrap();
        builder.finish().unwrap()
    }

    #[test]
    fn encodes_point_cloud_header() {
        let encoder = Encoder::new();
        let bytes = encoder.encode_point_cloud(&points()).unwrap();
        assert_eq!(&bytes[..5], b"DRACO");
        assert_eq!(bytes[7], 0);
    }

    #[test]
    fn invalid_quantization_fails_at_encode() {
        let mut encoder = Encoder::new();
        encoder.set_attribute_quantization(AttributeRole::Position, 31);
        let err = encoder.encode_point_cloud(&points()).unwrap_err();
        assert_eq!(err.code(), Some(-1));
        // The encoder stays usable once the bad setting is cleared.
        encoder.set_attribute_quantization(AttributeRole::Position, 0);
        assert_eq!(&encoder.encode_point_cloud(&points()).unwrap()[..5], b"DRACO");
    }

    #[test]
    fn released_inputs_are_reported() {
        let mut encoder = Encoder::new();
        let mut pc = points();
        pc.release();
        assert_eq!(encoder.encode_point_cloud(&pc), Err(Error::Released));
        encoder.release();
        encoder.release();
        assert!(encoder.is_released());
        assert_eq!(encoder.encode_mesh(&Mesh::new()), Err(Error::Released));
        // Configuring a released encoder is a logged no-op.
        encoder.set_attribute_quantization(AttributeRole::Position, 10);
    }
}
