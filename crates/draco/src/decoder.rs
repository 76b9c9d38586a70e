use std::os::raw::c_char;

use draco_core::c_api::{
    draco_decoder_decode_mesh, draco_decoder_decode_point_cloud, draco_decoder_t, draco_get_encoded_geometry_type,
    draco_new_decoder, draco_point_cloud_t,
};
use log::debug;

use crate::error::{check_status, Error};
use crate::handle::Handle;
use crate::mesh::Mesh;
use crate::point_cloud::{sealed, Geometry, PointCloud};
use crate::registry::GeometryType;

/// Classifies a blob from its header without decoding it.
pub fn get_encoded_geometry_type(data: &[u8]) -> GeometryType {
    GeometryType::from_native(unsafe { draco_get_encoded_geometry_type(data.as_ptr().cast::<c_char>(), data.len()) })
}

/// Geometry produced by [`Decoder::decode`].
#[derive(Debug)]
pub enum DecodedGeometry {
    PointCloud(PointCloud),
    Mesh(Mesh),
}

impl DecodedGeometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            DecodedGeometry::PointCloud(_) => GeometryType::PointCloud,
            DecodedGeometry::Mesh(_) => GeometryType::TriangularMesh,
        }
    }

    pub fn into_mesh(self) -> Option<Mesh> {
        match self {
            DecodedGeometry::Mesh(mesh) => Some(mesh),
            DecodedGeometry::PointCloud(_) => None,
        }
    }

    pub fn into_point_cloud(self) -> Option<PointCloud> {
        match self {
            DecodedGeometry::PointCloud(pc) => Some(pc),
            DecodedGeometry::Mesh(_) => None,
        }
    }
}

impl sealed::Sealed for DecodedGeometry {}

impl Geometry for DecodedGeometry {
    fn raw(&self) -> *mut draco_point_cloud_t {
        match self {
            DecodedGeometry::PointCloud(pc) => pc.raw(),
            DecodedGeometry::Mesh(mesh) => mesh.raw(),
        }
    }

    fn live_raw(&self) -> Result<*mut draco_point_cloud_t, Error> {
        match self {
            DecodedGeometry::PointCloud(pc) => pc.live_raw(),
            DecodedGeometry::Mesh(mesh) => mesh.live_raw(),
        }
    }
}

/// Decodes Draco blobs into point clouds and meshes.
pub struct Decoder {
    handle: Handle<draco_decoder_t>,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            handle: Handle::from_raw(draco_new_decoder()),
        }
    }

    /// Replaces the contents of `mesh` with the decoded blob. A point cloud
    /// blob yields a mesh without faces. `mesh` is left untouched on error.
    pub fn decode_mesh(&self, mesh: &mut Mesh, data: &[u8]) -> Result<(), Error> {
        let decoder = self.handle.live()?;
        let target = mesh.live_raw()?;
        let status =
            unsafe { draco_decoder_decode_mesh(decoder, data.as_ptr().cast::<c_char>(), data.len(), target) };
        unsafe { check_status(status) }?;
        debug!("decoded mesh with {} faces", mesh.num_faces());
        Ok(())
    }

    /// Replaces the contents of `pc` with the points and attributes of the
    /// blob. Mesh connectivity is dropped.
    pub fn decode_point_cloud(&self, pc: &mut PointCloud, data: &[u8]) -> Result<(), Error> {
        let decoder = self.handle.live()?;
        let target = pc.live_raw()?;
        let status =
            unsafe { draco_decoder_decode_point_cloud(decoder, data.as_ptr().cast::<c_char>(), data.len(), target) };
        unsafe { check_status(status) }?;
        debug!("decoded point cloud with {} points", pc.num_points());
        Ok(())
    }

    /// Decodes into a new geometry of the kind named by `hint`, which is
    /// not inferred from the blob.
    pub fn decode(&self, hint: GeometryType, data: &[u8]) -> Result<DecodedGeometry, Error> {
        match hint {
            GeometryType::PointCloud => {
                let mut pc = PointCloud::new();
                self.decode_point_cloud(&mut pc, data)?;
                Ok(DecodedGeometry::PointCloud(pc))
            }
            GeometryType::TriangularMesh => {
                let mut mesh = Mesh::new();
                self.decode_mesh(&mut mesh, data)?;
                Ok(DecodedGeometry::Mesh(mesh))
            }
            GeometryType::Invalid => Err(Error::InvalidGeometryType(hint)),
        }
    }

    pub fn release(&mut self) {
        self.handle.release();
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_blob_is_a_header_error() {
        let decoder = Decoder::new();
        let mut mesh = Mesh::new();
        let err = decoder.decode_mesh(&mut mesh, &[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            Error::Codec {
                code: -2,
                message: "Failed to parse Draco header.".to_string()
            }
        );
        assert_eq!(decoder.decode(GeometryType::PointCloud, &[]).unwrap_err().code(), Some(-2));
    }

    #[test]
    fn invalid_hint_is_rejected() {
        let decoder = Decoder::new();
        assert_eq!(
            decoder.decode(GeometryType::Invalid, b"DRACO").unwrap_err(),
            Error::InvalidGeometryType(GeometryType::Invalid)
        );
    }

    #[test]
    fn sniffing_needs_a_full_header() {
        assert_eq!(get_encoded_geometry_type(&[]), GeometryType::Invalid);
        assert_eq!(get_encoded_geometry_type(b"DRACO\x02"), GeometryType::Invalid);
        assert_eq!(
            get_encoded_geometry_type(b"DRACO\x02\x02\x01\x00\x00\x00"),
            GeometryType::TriangularMesh
        );
        assert_eq!(
            get_encoded_geometry_type(b"DRACO\x02\x03\x00\x00\x00\x00"),
            GeometryType::PointCloud
        );
    }

    #[test]
    fn released_decoder_refuses_work() {
        let mut decoder = Decoder::new();
        decoder.release();
        decoder.release();
        let mut pc = PointCloud::new();
        assert_eq!(decoder.decode_point_cloud(&mut pc, b"DRACO"), Err(Error::Released));
    }
}
