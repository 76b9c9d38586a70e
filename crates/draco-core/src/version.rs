//! Bitstream versions written and accepted by the sequential codecs.

use std::fmt;

/// A `major.minor` bitstream version. Ordering is lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitstreamVersion {
    pub major: u8,
    pub minor: u8,
}

impl BitstreamVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        BitstreamVersion { major, minor }
    }

    /// Latest version written for meshes.
    pub const MESH: BitstreamVersion = BitstreamVersion::new(2, 2);

    /// Latest version written for point clouds.
    pub const POINT_CLOUD: BitstreamVersion = BitstreamVersion::new(2, 3);

    /// Mesh counts switched from fixed-width to varint here.
    pub const VARINT_INDICES: BitstreamVersion = BitstreamVersion::new(2, 2);

    /// Older streams use layouts the sequential decoders do not read.
    pub const MIN_SUPPORTED_MAJOR: u8 = 2;
}

impl fmt::Display for BitstreamVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
