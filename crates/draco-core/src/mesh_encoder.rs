use log::debug;

use crate::compression_config::{EncodedGeometryType, MeshEncodingMethod, SequentialConnectivityMethod};
use crate::encoder_buffer::EncoderBuffer;
use crate::encoder_options::EncoderOptions;
use crate::mesh::Mesh;
use crate::point_cloud_encoder::{check_sequential_method, encode_header};
use crate::sequential_attribute_encoder::encode_attributes;
use crate::status::{DracoError, Status};
use crate::version::BitstreamVersion;

/// Sequential mesh encoder with uncompressed connectivity.
#[derive(Debug, Default)]
pub struct MeshEncoder;

impl MeshEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, mesh: &Mesh, options: &EncoderOptions, out_buffer: &mut EncoderBuffer) -> Status {
        check_sequential_method(options)?;
        let num_points = mesh.num_points();
        for (f, face) in mesh.faces().iter().enumerate() {
            if face.iter().any(|p| p.0 as usize >= num_points) {
                return Err(DracoError::InvalidParameter(format!(
                    "Face {} references a point outside the mesh.",
                    f
                )));
            }
        }

        encode_header(
            out_buffer,
            BitstreamVersion::MESH,
            EncodedGeometryType::TriangularMesh,
            MeshEncodingMethod::MeshSequentialEncoding as u8,
        );
        self.encode_connectivity(mesh, out_buffer);
        encode_attributes(mesh, options, out_buffer)?;
        debug!(
            "encoded mesh: {} faces, {} points, {} bytes",
            mesh.num_faces(),
            num_points,
            out_buffer.size()
        );
        Ok(())
    }

    fn encode_connectivity(&self, mesh: &Mesh, out_buffer: &mut EncoderBuffer) {
        let num_points = mesh.num_points();
        out_buffer.encode_varint(mesh.num_faces() as u64);
        out_buffer.encode_varint(num_points as u64);
        out_buffer.encode_u8(SequentialConnectivityMethod::Uncompressed as u8);

        let indices = mesh.faces().iter().flatten().copied();
        if num_points < 256 {
            indices.for_each(|p| out_buffer.encode_u8(p.0 as u8));
        } else if num_points < (1 << 16) {
            indices.for_each(|p| out_buffer.encode_u16(p.0 as u16));
        } else if num_points < (1 << 21) {
            indices.for_each(|p| out_buffer.encode_varint(p.0 as u64));
        } else {
            indices.for_each(|p| out_buffer.encode_u32(p.0));
        }
    }
}
