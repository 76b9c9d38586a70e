use crate::geometry_attribute::{GeometryAttributeType, PointAttribute};

#[derive(Debug, Default, Clone)]
pub struct PointCloud {
    attributes: Vec<PointAttribute>,
    num_points: usize,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_num_points(&mut self, num_points: usize) {
        self.num_points = num_points;
    }

    /// Adds an attribute and returns its id. Unique ids follow insertion order.
    pub fn add_attribute(&mut self, mut attribute: PointAttribute) -> i32 {
        if self.num_points == 0 && attribute.size() > 0 {
            self.num_points = attribute.size();
        }
        let id = self.attributes.len() as i32;
        attribute.set_unique_id(id as u32);
        self.attributes.push(attribute);
        id
    }

    pub fn num_attributes(&self) -> i32 {
        self.attributes.len() as i32
    }

    pub fn attribute(&self, att_id: i32) -> Option<&PointAttribute> {
        usize::try_from(att_id).ok().and_then(|i| self.attributes.get(i))
    }

    pub fn attribute_mut(&mut self, att_id: i32) -> Option<&mut PointAttribute> {
        usize::try_from(att_id)
            .ok()
            .and_then(move |i| self.attributes.get_mut(i))
    }

    pub fn attributes(&self) -> &[PointAttribute] {
        &self.attributes
    }

    pub fn attribute_by_unique_id(&self, unique_id: u32) -> Option<&PointAttribute> {
        self.attributes.iter().find(|a| a.unique_id() == unique_id)
    }

    /// Id of the first attribute with role `att_type`, or -1.
    pub fn named_attribute_id(&self, att_type: GeometryAttributeType) -> i32 {
        self.attributes
            .iter()
            .position(|att| att.attribute_type() == att_type)
            .map_or(-1, |i| i as i32)
    }

    pub fn named_attribute(&self, att_type: GeometryAttributeType) -> Option<&PointAttribute> {
        self.attribute(self.named_attribute_id(att_type))
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }
}
