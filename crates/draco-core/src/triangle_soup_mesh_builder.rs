use log::warn;

use crate::draco_types::DataType;
use crate::geometry_attribute::{GeometryAttributeType, PointAttribute};
use crate::geometry_indices::PointIndex;
use crate::mesh::Mesh;

/// Builds a mesh from independent triangles. Corner `k` of face `f` is
/// point `3 * f + k`; shared corners are not merged.
#[derive(Debug, Default)]
pub struct TriangleSoupMeshBuilder {
    mesh: Option<Mesh>,
}

impl TriangleSoupMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new build, discarding any unfinished one.
    pub fn start(&mut self, num_faces: usize) {
        let mut mesh = Mesh::new();
        mesh.set_num_points(num_faces * 3);
        for f in 0..num_faces as u32 {
            mesh.add_face([PointIndex(3 * f), PointIndex(3 * f + 1), PointIndex(3 * f + 2)]);
        }
        self.mesh = Some(mesh);
    }

    pub fn num_faces(&self) -> Option<usize> {
        self.mesh.as_ref().map(|m| m.num_faces())
    }

    /// Adds an empty attribute with one value per corner. Returns -1 when
    /// the builder is not started or the description is invalid.
    pub fn add_attribute(
        &mut self,
        attribute_type: GeometryAttributeType,
        num_components: u8,
        data_type: DataType,
        normalized: bool,
    ) -> i32 {
        let Some(mesh) = self.mesh.as_mut() else {
            warn!("mesh builder used before start or after finalize");
            return -1;
        };
        if attribute_type == GeometryAttributeType::Invalid
            || data_type == DataType::Invalid
            || !(1..=4).contains(&num_components)
        {
            warn!(
                "rejected attribute: type {:?}, {} components of {}",
                attribute_type, num_components, data_type
            );
            return -1;
        }
        let mut att = PointAttribute::new();
        att.init(attribute_type, num_components, data_type, normalized, mesh.num_points());
        mesh.add_attribute(att)
    }

    /// Copies host-order values for every corner of every face.
    pub fn set_attribute_values_for_all_corners(&mut self, att_id: i32, data: &[u8]) -> bool {
        let Some(att) = self.mesh.as_mut().and_then(|m| m.attribute_mut(att_id)) else {
            return false;
        };
        if data.len() != att.buffer().data_size() {
            warn!(
                "attribute {} expects {} bytes, got {}",
                att_id,
                att.buffer().data_size(),
                data.len()
            );
            return false;
        }
        att.buffer_mut().data_mut().copy_from_slice(data);
        true
    }

    /// Returns the finished mesh once; later calls return `None`.
    pub fn finalize(&mut self) -> Option<Mesh> {
        self.mesh.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry_indices::FaceIndex;

    #[test]
    fn faces_index_corners() {
        let mut builder = TriangleSoupMeshBuilder::new();
        builder.start(2);
        let id = builder.add_attribute(GeometryAttributeType::TexCoord, 2, DataType::Float32, false);
        assert!(builder.set_attribute_values_for_all_corners(id, &[0u8; 6 * 8]));

        let mesh = builder.finalize().unwrap();
        assert_eq!(mesh.num_points(), 6);
        assert_eq!(mesh.face(FaceIndex(1)), [PointIndex(3), PointIndex(4), PointIndex(5)]);
        assert!(builder.finalize().is_none());
        assert_eq!(builder.num_faces(), None);
    }
}
