/// Geometry type stored in a Draco header. Discriminants are the C API tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedGeometryType {
    InvalidGeometryType = -1,
    PointCloud = 0,
    TriangularMesh = 1,
}

impl EncodedGeometryType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => EncodedGeometryType::PointCloud,
            1 => EncodedGeometryType::TriangularMesh,
            _ => EncodedGeometryType::InvalidGeometryType,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCloudEncodingMethod {
    PointCloudSequentialEncoding = 0,
    PointCloudKdTreeEncoding = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshEncodingMethod {
    MeshSequentialEncoding = 0,
    MeshEdgebreakerEncoding = 1,
}

/// Connectivity layout of a sequential mesh stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequentialConnectivityMethod {
    Compressed = 0,
    Uncompressed = 1,
}

/// Per-attribute payload kind written in the attributes block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequentialAttributeEncoderType {
    Generic = 0,
    Integer = 1,
    Quantization = 2,
    Normals = 3,
}

impl SequentialAttributeEncoderType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SequentialAttributeEncoderType::Generic),
            1 => Some(SequentialAttributeEncoderType::Integer),
            2 => Some(SequentialAttributeEncoderType::Quantization),
            3 => Some(SequentialAttributeEncoderType::Normals),
            _ => None,
        }
    }
}

/// Header flag announcing a metadata section.
pub const METADATA_FLAG_MASK: u16 = 0x8000;

/// Prediction method byte meaning "no prediction".
pub const PREDICTION_NONE: i8 = -2;
