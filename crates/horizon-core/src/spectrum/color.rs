//! Tristimulus to display RGB.

use palette::white_point::D65;
use palette::{LinSrgb, Xyz};

/// A 3x3 color matrix for linear color space conversions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix(pub [[f64; 3]; 3]);

/// CIE XYZ (D65) to linear sRGB, as published by Lindbloom.
pub const XYZ_TO_LINEAR_SRGB: ColorMatrix = ColorMatrix([
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
]);

impl ColorMatrix {
    /// Returns the identity matrix (no-op transform).
    pub const fn identity() -> Self {
        Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Apply this matrix to a tristimulus value.
    pub fn apply(&self, xyz: Xyz<D65, f64>) -> LinSrgb<f64> {
        let m = &self.0;
        let v = [xyz.x, xyz.y, xyz.z];
        LinSrgb::new(
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        )
    }
}

/// Scale linear channels by `normalization` and clamp them into `[0, 255]`.
///
/// Fractions are truncated. NaN channels map to 0.
pub fn quantize(rgb: [f64; 3], normalization: f64) -> [u8; 3] {
    rgb.map(|c| {
        let v = c * normalization;
        if v.is_nan() { 0 } else { v.clamp(0.0, 255.0) as u8 }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_matrix_passes_values_through() {
        let rgb = ColorMatrix::identity().apply(Xyz::new(0.1, 0.2, 0.3));
        assert_eq!((rgb.red, rgb.green, rgb.blue), (0.1, 0.2, 0.3));
    }

    #[test]
    fn test_d65_white_maps_to_neutral() {
        // D65 white point with Y = 1.
        let rgb = XYZ_TO_LINEAR_SRGB.apply(Xyz::new(0.95047, 1.0, 1.08883));
        assert!((rgb.red - 1.0).abs() < 1e-3);
        assert!((rgb.green - 1.0).abs() < 1e-3);
        assert!((rgb.blue - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_quantize_clamps_and_truncates() {
        assert_eq!(quantize([-4.0, 127.9, 900.0], 1.0), [0, 127, 255]);
        assert_eq!(quantize([f64::NAN, 10.0, 10.0], 0.5), [0, 5, 5]);
    }
}
