use log::debug;

use crate::compression_config::{EncodedGeometryType, METADATA_FLAG_MASK};
use crate::decoder_buffer::DecoderBuffer;
use crate::point_cloud::PointCloud;
use crate::sequential_attribute_decoder::decode_attributes;
use crate::status::{DracoError, Status, StatusOr};
use crate::version::BitstreamVersion;

const DRACO_MAGIC: &[u8; 5] = b"DRACO";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DracoHeader {
    pub version_major: u8,
    pub version_minor: u8,
    pub encoder_type: EncodedGeometryType,
    pub encoder_method: u8,
    pub flags: u16,
}

impl DracoHeader {
    pub fn version(&self) -> BitstreamVersion {
        BitstreamVersion::new(self.version_major, self.version_minor)
    }
}

fn header_error() -> DracoError {
    DracoError::IoError("Failed to parse Draco header.".into())
}

/// Parses the fixed-size header. Does not check versions or methods.
pub fn parse_header(buffer: &mut DecoderBuffer) -> StatusOr<DracoHeader> {
    let magic = buffer.decode_slice(DRACO_MAGIC.len()).map_err(|_| header_error())?;
    if magic != DRACO_MAGIC {
        return Err(DracoError::DracoError("Not a Draco file.".into()));
    }
    let version_major = buffer.decode_u8().map_err(|_| header_error())?;
    let version_minor = buffer.decode_u8().map_err(|_| header_error())?;
    let encoder_type = EncodedGeometryType::from_u8(buffer.decode_u8().map_err(|_| header_error())?);
    let encoder_method = buffer.decode_u8().map_err(|_| header_error())?;
    let flags = buffer.decode_u16().map_err(|_| header_error())?;
    Ok(DracoHeader {
        version_major,
        version_minor,
        encoder_type,
        encoder_method,
        flags,
    })
}

/// Validates everything in the header that a sequential decoder relies on.
pub fn check_header(header: &DracoHeader) -> Status {
    let latest = match header.encoder_type {
        EncodedGeometryType::PointCloud => BitstreamVersion::POINT_CLOUD,
        EncodedGeometryType::TriangularMesh => BitstreamVersion::MESH,
        EncodedGeometryType::InvalidGeometryType => {
            return Err(DracoError::DracoError("Unsupported geometry type.".into()))
        }
    };
    let version = header.version();
    if version.major > latest.major {
        return Err(DracoError::UnknownVersion("Unknown major version.".into()));
    }
    if version > latest {
        return Err(DracoError::UnknownVersion("Unknown minor version.".into()));
    }
    if version.major < BitstreamVersion::MIN_SUPPORTED_MAJOR {
        return Err(DracoError::UnsupportedVersion(format!("Version {} is not supported.", version)));
    }
    if header.encoder_method != 0 {
        return Err(DracoError::DracoError("Unsupported encoding method.".into()));
    }
    if header.flags & METADATA_FLAG_MASK != 0 {
        return Err(DracoError::UnsupportedFeature("Metadata is not supported.".into()));
    }
    Ok(())
}

/// Decodes sequential point cloud streams.
#[derive(Debug, Default)]
pub struct PointCloudDecoder;

impl PointCloudDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, in_buffer: &mut DecoderBuffer, out_pc: &mut PointCloud) -> Status {
        let header = parse_header(in_buffer)?;
        check_header(&header)?;
        if header.encoder_type != EncodedGeometryType::PointCloud {
            return Err(DracoError::DracoError("Input is not a point cloud.".into()));
        }
        in_buffer.set_version(header.version());
        self.decode_geometry_data(in_buffer, out_pc)
    }

    /// Decodes everything after the header.
    pub fn decode_geometry_data(&self, in_buffer: &mut DecoderBuffer, out_pc: &mut PointCloud) -> Status {
        let num_points = in_buffer
            .decode_u32()
            .map_err(|_| DracoError::DracoError("Failed to decode geometry data.".into()))?;
        out_pc.set_num_points(num_points as usize);
        decode_attributes(in_buffer, out_pc)?;
        debug!(
            "decoded point cloud: {} points, {} attributes",
            num_points,
            out_pc.num_attributes()
        );
        Ok(())
    }
}
