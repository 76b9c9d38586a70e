use log::warn;

use crate::draco_types::DataType;
use crate::geometry_attribute::{GeometryAttributeType, PointAttribute};
use crate::point_cloud::PointCloud;

/// Builds a point cloud one attribute at a time.
///
/// Usage: `start`, then `add_attribute` and
/// `set_attribute_values_for_all_points` per attribute, then `finalize`.
/// Values are not deduplicated.
#[derive(Debug, Default)]
pub struct PointCloudBuilder {
    point_cloud: Option<PointCloud>,
}

impl PointCloudBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new build, discarding any unfinished one.
    pub fn start(&mut self, num_points: usize) {
        let mut pc = PointCloud::new();
        pc.set_num_points(num_points);
        self.point_cloud = Some(pc);
    }

    pub fn num_points(&self) -> Option<usize> {
        self.point_cloud.as_ref().map(|pc| pc.num_points())
    }

    /// Adds an empty attribute sized for every point. Returns -1 when the
    /// builder is not started or the description is invalid.
    pub fn add_attribute(
        &mut self,
        attribute_type: GeometryAttributeType,
        num_components: u8,
        data_type: DataType,
        normalized: bool,
    ) -> i32 {
        let Some(pc) = self.point_cloud.as_mut() else {
            warn!("point cloud builder used before start or after finalize");
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
        att.init(attribute_type, num_components, data_type, normalized, pc.num_points());
        pc.add_attribute(att)
    }

    /// Copies host-order values for all points. `data` must hold exactly
    /// `num_points * num_components` values.
    pub fn set_attribute_values_for_all_points(&mut self, att_id: i32, data: &[u8]) -> bool {
        let Some(att) = self.point_cloud.as_mut().and_then(|pc| pc.attribute_mut(att_id)) else {
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

    /// Returns the finished point cloud once; later calls return `None`.
    pub fn finalize(&mut self) -> Option<PointCloud> {
        self.point_cloud.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_once() {
        let mut builder = PointCloudBuilder::new();
        assert_eq!(
            builder.add_attribute(GeometryAttributeType::Position, 3, DataType::Float32, false),
            -1
        );
        builder.start(2);
        let id = builder.add_attribute(GeometryAttributeType::Position, 3, DataType::Float32, false);
        assert_eq!(id, 0);
        assert!(!builder.set_attribute_values_for_all_points(id, &[0u8; 12]));
        assert!(builder.set_attribute_values_for_all_points(id, &[0u8; 24]));

        let pc = builder.finalize().unwrap();
        assert_eq!(pc.num_points(), 2);
        assert_eq!(pc.num_attributes(), 1);
        assert!(builder.finalize().is_none());
    }

    #[test]
    fn rejects_bad_descriptions() {
        let mut builder = PointCloudBuilder::new();
        builder.start(1);
        assert_eq!(builder.add_attribute(GeometryAttributeType::Invalid, 1, DataType::Int8, false), -1);
        assert_eq!(builder.add_attribute(GeometryAttributeType::Generic, 5, DataType::Int8, false), -1);
        assert_eq!(builder.add_attribute(GeometryAttributeType::Generic, 1, DataType::Invalid, false), -1);
    }
}
