/// Largest quantized value for a bit depth, `(1 << bits) - 1`.
pub fn max_quantized_value(quantization_bits: i32) -> i32 {
    ((1u64 << quantization_bits.clamp(0, 31) as u32) - 1) as i32
}

/// Maps signed values to unsigned symbols: 0, -1, 1, -2 ... become 0, 1, 2, 3 ...
pub fn convert_signed_int_to_symbol(val: i32) -> u32 {
    if val >= 0 {
        (val as u32) << 1
    } else {
        ((-(val + 1)) as u32) << 1 | 1
    }
}

pub fn convert_symbol_to_signed_int(symbol: u32) -> i32 {
    let v = (symbol >> 1) as i32;
    if symbol & 1 == 0 {
        v
    } else {
        -v - 1
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Quantizer {
    inverse_delta: f32,
}

impl Quantizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, range: f32, max_quantized_value: i32) {
        if range > 0.0 {
            self.inverse_delta = max_quantized_value as f32 / range;
        } else {
            self.inverse_delta = 0.0;
        }
    }

    pub fn quantize_float(&self, val: f32) -> i32 {
        let val = val * self.inverse_delta;
        (val + 0.5).floor() as i32
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Dequantizer {
    delta: f32,
}

impl Dequantizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, range: f32, max_quantized_value: i32) -> bool {
        if max_quantized_value > 0 {
            self.delta = range / max_quantized_value as f32;
            true
        } else {
            false
        }
    }

    pub fn dequantize_float(&self, val: i32) -> f32 {
        val as f32 * self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_symbols() {
        for (v, s) in [(0, 0), (-1, 1), (1, 2), (-2, 3), (2, 4)] {
            assert_eq!(convert_signed_int_to_symbol(v), s);
            assert_eq!(convert_symbol_to_signed_int(s), v);
        }
        assert_eq!(convert_symbol_to_signed_int(convert_signed_int_to_symbol(i32::MIN)), i32::MIN);
    }

    #[test]
    fn quantize_then_dequantize_within_step() {
        let max = max_quantized_value(11);
        assert_eq!(max, 2047);
        let mut q = Quantizer::new();
        q.init(10.0, max);
        let mut d = Dequantizer::new();
        assert!(d.init(10.0, max));
        let step = 10.0 / max as f32;
        for v in [0.0f32, 1.25, 3.3, 9.99, 10.0] {
            let back = d.dequantize_float(q.quantize_float(v));
            assert!((back - v).abs() <= step);
        }
    }
}
