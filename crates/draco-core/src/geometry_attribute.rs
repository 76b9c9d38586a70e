use crate::data_buffer::DataBuffer;
use crate::draco_types::{convert_component, DataType, DracoScalar};
use crate::geometry_indices::{AttributeValueIndex, PointIndex};

/// Semantic role of an attribute. Discriminants are the stable C API tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryAttributeType {
    Invalid = -1,
    Position = 0,
    Normal,
    Color,
    TexCoord,
    Generic,
}

impl GeometryAttributeType {
    pub fn from_tag(tag: i64) -> Self {
        match tag {
            0 => GeometryAttributeType::Position,
            1 => GeometryAttributeType::Normal,
            2 => GeometryAttributeType::Color,
            3 => GeometryAttributeType::TexCoord,
            4 => GeometryAttributeType::Generic,
            _ => GeometryAttributeType::Invalid,
        }
    }
}

/// An attribute together with the values it stores.
///
/// Values are packed without padding, so the stride is always the entry
/// size and the offset is zero. Points map to values one to one; the engine
/// never deduplicates.
#[derive(Debug, Clone)]
pub struct PointAttribute {
    role: GeometryAttributeType,
    data_type: DataType,
    num_components: u8,
    normalized: bool,
    unique_id: u32,
    values: DataBuffer,
    num_values: usize,
}

impl Default for PointAttribute {
    fn default() -> Self {
        PointAttribute {
            role: GeometryAttributeType::Invalid,
            data_type: DataType::Invalid,
            num_components: 0,
            normalized: false,
            unique_id: 0,
            values: DataBuffer::default(),
            num_values: 0,
        }
    }
}

impl PointAttribute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the layout and allocates `num_values` zeroed entries.
    pub fn init(
        &mut self,
        role: GeometryAttributeType,
        num_components: u8,
        data_type: DataType,
        normalized: bool,
        num_values: usize,
    ) {
        self.role = role;
        self.num_components = num_components;
        self.data_type = data_type;
        self.normalized = normalized;
        self.num_values = num_values;
        self.values.resize(num_values * self.entry_size());
    }

    fn entry_size(&self) -> usize {
        self.num_components as usize * self.data_type.byte_length()
    }

    pub fn mapped_index(&self, point: PointIndex) -> AttributeValueIndex {
        AttributeValueIndex(point.0)
    }

    /// Number of stored entries.
    pub fn size(&self) -> usize {
        self.num_values
    }

    pub fn buffer(&self) -> &DataBuffer {
        &self.values
    }

    pub fn buffer_mut(&mut self) -> &mut DataBuffer {
        &mut self.values
    }

    pub fn attribute_type(&self) -> GeometryAttributeType {
        self.role
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn num_components(&self) -> u8 {
        self.num_components
    }

    pub fn normalized(&self) -> bool {
        self.normalized
    }

    pub fn byte_stride(&self) -> i64 {
        self.entry_size() as i64
    }

    pub fn byte_offset(&self) -> i64 {
        0
    }

    pub fn unique_id(&self) -> u32 {
        self.unique_id
    }

    pub fn set_unique_id(&mut self, id: u32) {
        self.unique_id = id;
    }

    /// Raw bytes of one entry, `None` when the index is out of range.
    pub fn value_bytes(&self, index: AttributeValueIndex) -> Option<&[u8]> {
        let size = self.entry_size();
        let start = usize::from(index) * size;
        self.values.data().get(start..start + size)
    }

    /// Overwrites one entry; `src` must hold exactly one entry.
    pub fn set_value_bytes(&mut self, index: AttributeValueIndex, src: &[u8]) -> bool {
        let size = self.entry_size();
        let start = usize::from(index) * size;
        if src.len() != size || start + size > self.values.data_size() {
            return false;
        }
        self.values.write(start, src);
        true
    }

    /// Converts the entry at `index` into `out`, one element per component.
    ///
    /// Fails when the entry does not exist, `out` is too short, or a
    /// component cannot be represented in `T`.
    pub fn convert_value<T: DracoScalar>(&self, index: AttributeValueIndex, out: &mut [T]) -> bool {
        let count = self.num_components as usize;
        if out.len() < count {
            return false;
        }
        let Some(entry) = self.value_bytes(index) else {
            return false;
        };
        let width = self.data_type.byte_length();
        if width == 0 {
            return false;
        }
        out[..count]
            .iter_mut()
            .zip(entry.chunks_exact(width))
            .all(|(slot, bytes)| match convert_component::<T>(self.data_type, bytes) {
                Some(v) => {
                    *slot = v;
                    true
                }
                None => false,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_attribute(values: &[f32], num_components: u8) -> PointAttribute {
        let mut att = PointAttribute::new();
        let count = values.len() / num_components as usize;
        att.init(GeometryAttributeType::Position, num_components, DataType::Float32, false, count);
        for (i, v) in values.iter().enumerate() {
            att.buffer_mut().write(i * 4, &v.to_ne_bytes());
        }
        att
    }

    #[test]
    fn init_sets_stride_and_size() {
        let att = float_attribute(&[0.0; 9], 3);
        assert_eq!(att.byte_stride(), 12);
        assert_eq!(att.size(), 3);
        assert_eq!(att.buffer().data_size(), 36);
    }

    #[test]
    fn convert_value_widens_and_narrows() {
        let att = float_attribute(&[1.0, 2.0, 3.0, 4.5, 5.0, 6.0], 3);
        let mut wide = [0f64; 3];
        assert!(att.convert_value(AttributeValueIndex(1), &mut wide));
        assert_eq!(wide, [4.5, 5.0, 6.0]);

        let mut narrow = [0i16; 3];
        assert!(att.convert_value(AttributeValueIndex(0), &mut narrow));
        assert_eq!(narrow, [1, 2, 3]);

        assert!(!att.convert_value(AttributeValueIndex(2), &mut wide));
    }

    #[test]
    fn set_value_bytes_checks_entry_size() {
        let mut att = float_attribute(&[0.0; 4], 2);
        assert!(!att.set_value_bytes(AttributeValueIndex(0), &[0u8; 4]));
        assert!(att.set_value_bytes(AttributeValueIndex(1), &[0u8; 8]));
        assert!(!att.set_value_bytes(AttributeValueIndex(2), &[0u8; 8]));
    }
}
