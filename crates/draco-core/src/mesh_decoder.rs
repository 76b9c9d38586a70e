use log::debug;

use crate::compression_config::{EncodedGeometryType, SequentialConnectivityMethod};
use crate::decoder_buffer::DecoderBuffer;
use crate::geometry_indices::PointIndex;
use crate::mesh::{Face, Mesh};
use crate::point_cloud_decoder::{check_header, parse_header, PointCloudDecoder};
use crate::sequential_attribute_decoder::decode_attributes;
use crate::status::{DracoError, Status};
use crate::version::BitstreamVersion;

fn geometry_error() -> DracoError {
    DracoError::DracoError("Failed to decode geometry data.".into())
}

fn decode_index(buffer: &mut DecoderBuffer, num_points: u32, varint_indices: bool) -> Result<u32, DracoError> {
    if num_points < 256 {
        buffer.decode_u8().map(u32::from)
    } else if num_points < (1 << 16) {
        buffer.decode_u16().map(u32::from)
    } else if varint_indices {
        buffer.decode_varint_u32()
    } else {
        buffer.decode_u32()
    }
}

/// Decodes sequential mesh streams. A point cloud stream decodes into a
/// mesh without faces.
#[derive(Debug, Default)]
pub struct MeshDecoder;

impl MeshDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, in_buffer: &mut DecoderBuffer, out_mesh: &mut Mesh) -> Status {
        let header = parse_header(in_buffer)?;
        check_header(&header)?;
        in_buffer.set_version(header.version());
        match header.encoder_type {
            EncodedGeometryType::PointCloud => {
                PointCloudDecoder::new().decode_geometry_data(in_buffer, out_mesh)
            }
            _ => {
                self.decode_connectivity(in_buffer, out_mesh)?;
                decode_attributes(in_buffer, out_mesh)?;
                debug!(
                    "decoded mesh: {} faces, {} points, {} attributes",
                    out_mesh.num_faces(),
                    out_mesh.num_points(),
                    out_mesh.num_attributes()
                );
                Ok(())
            }
        }
    }

    fn decode_connectivity(&self, in_buffer: &mut DecoderBuffer, mesh: &mut Mesh) -> Status {
        let varint_counts = in_buffer.version() >= BitstreamVersion::VARINT_INDICES;
        let (num_faces, num_points) = if varint_counts {
            (in_buffer.decode_varint_u32(), in_buffer.decode_varint_u32())
        } else {
            (in_buffer.decode_u32(), in_buffer.decode_u32())
        };
        let num_faces = num_faces.map_err(|_| geometry_error())? as usize;
        let num_points = num_points.map_err(|_| geometry_error())?;

        let method = in_buffer.decode_u8().map_err(|_| geometry_error())?;
        if method != SequentialConnectivityMethod::Uncompressed as u8 {
            debug!("compressed sequential connectivity is not supported");
            return Err(geometry_error());
        }
        // Every face needs at least three bytes of indices.
        if num_faces.saturating_mul(3) > in_buffer.remaining_size() {
            return Err(geometry_error());
        }

        let varint_indices = varint_counts && num_points < (1 << 21);
        mesh.set_num_points(num_points as usize);
        mesh.clear_faces();
        mesh.reserve_faces(num_faces);
        for _ in 0..num_faces {
            let mut face: Face = [PointIndex(0); 3];
            for corner in face.iter_mut() {
                let index = decode_index(in_buffer, num_points, varint_indices).map_err(|_| geometry_error())?;
                if index >= num_points {
                    return Err(geometry_error());
                }
                *corner = PointIndex(index);
            }
            mesh.add_face(face);
        }
        Ok(())
    }
}
