use std::collections::HashMap;

use crate::geometry_attribute::GeometryAttributeType;

pub const QUANTIZATION_BITS_KEY: &str = "quantization_bits";
pub const ENCODING_METHOD_KEY: &str = "encoding_method";

/// Integer options keyed by name, globally and per attribute id, plus
/// quantization depths keyed by attribute role.
#[derive(Debug, Clone, Default)]
pub struct EncoderOptions {
    global_options: HashMap<String, i32>,
    attribute_options: HashMap<i32, HashMap<String, i32>>,
    role_quantization: HashMap<GeometryAttributeType, i32>,
}

impl EncoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_encoding_method(&self) -> Option<i32> {
        self.global_options.get(ENCODING_METHOD_KEY).copied()
    }

    pub fn set_encoding_method(&mut self, value: i32) {
        self.set_global_int(ENCODING_METHOD_KEY, value);
    }

    pub fn set_global_int(&mut self, key: &str, value: i32) {
        self.global_options.insert(key.to_string(), value);
    }

    pub fn get_global_int(&self, key: &str, default_val: i32) -> i32 {
        *self.global_options.get(key).unwrap_or(&default_val)
    }

    pub fn set_attribute_int(&mut self, att_id: i32, key: &str, value: i32) {
        self.attribute_options
            .entry(att_id)
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Per-attribute value, falling back to the global option.
    pub fn get_attribute_int(&self, att_id: i32, key: &str, default_val: i32) -> i32 {
        self.attribute_options
            .get(&att_id)
            .and_then(|opts| opts.get(key))
            .copied()
            .unwrap_or_else(|| self.get_global_int(key, default_val))
    }

    pub fn set_attribute_quantization(&mut self, role: GeometryAttributeType, bits: i32) {
        self.role_quantization.insert(role, bits);
    }

    /// Quantization depth for an attribute: the per-id option wins over the
    /// per-role setting. Returns 0 when the attribute is stored losslessly.
    pub fn quantization_bits(&self, att_id: i32, role: GeometryAttributeType) -> i32 {
        let by_role = self.role_quantization.get(&role).copied().unwrap_or(0);
        self.get_attribute_int(att_id, QUANTIZATION_BITS_KEY, by_role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_option_overrides_role() {
        let mut options = EncoderOptions::new();
        options.set_attribute_quantization(GeometryAttributeType::Position, 14);
        assert_eq!(options.quantization_bits(0, GeometryAttributeType::Position), 14);
        assert_eq!(options.quantization_bits(0, GeometryAttributeType::Normal), 0);

        options.set_attribute_int(0, QUANTIZATION_BITS_KEY, 10);
        assert_eq!(options.quantization_bits(0, GeometryAttributeType::Position), 10);
        assert_eq!(options.quantization_bits(1, GeometryAttributeType::Position), 14);
    }

    #[test]
    fn global_fallback() {
        let mut options = EncoderOptions::new();
        options.set_global_int(QUANTIZATION_BITS_KEY, 8);
        assert_eq!(options.quantization_bits(3, GeometryAttributeType::Generic), 8);
        assert_eq!(options.get_encoding_method(), None);
        options.set_encoding_method(0);
        assert_eq!(options.get_encoding_method(), Some(0));
    }
}
