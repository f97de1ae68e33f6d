//! The radiance carried along a photon path.
//!
//! Two representations share one contract: the full [`Spectrum`] and the
//! reduced [`RgbColor`], used when only tri-channel textures are available.
//! The integrator is generic over this trait and never inspects which one it
//! is accumulating.

use std::ops::AddAssign;

use super::{MatchingTable, Spectrum, quantize};

/// Linear radiance value that can be composited along a ray.
pub trait Radiance: Clone + Send + Sync {
    /// Read-only data needed to turn the value into a display color.
    type Conversion: Sync;

    /// The value contributing nothing.
    fn zero() -> Self;

    /// The value multiplied by `factor`.
    fn scaled(&self, factor: f64) -> Self;

    /// Add `other` into `self`.
    fn accumulate(&mut self, other: &Self);

    /// Wavelength dilation by `factor`; `1.0` is the identity.
    fn shifted(&self, factor: f64) -> Self;

    /// 8-bit display color, channels clamped to `[0, 255]`.
    fn to_rgb(&self, conversion: &Self::Conversion, normalization: f64) -> [u8; 3];
}

impl Radiance for Spectrum {
    type Conversion = MatchingTable;

    fn zero() -> Self {
        Spectrum::zero()
    }

    fn scaled(&self, factor: f64) -> Self {
        Spectrum::scaled(self, factor)
    }

    fn accumulate(&mut self, other: &Self) {
        *self += other;
    }

    fn shifted(&self, factor: f64) -> Self {
        Spectrum::shifted(self, factor)
    }

    fn to_rgb(&self, conversion: &MatchingTable, normalization: f64) -> [u8; 3] {
        Spectrum::to_rgb(self, conversion, normalization)
    }
}

/// Opaque tri-channel radiance in linear display units.
///
/// Carries no wavelength axis, so a wavelength dilation leaves it untouched,
/// and its conversion is the identity table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RgbColor(pub [f64; 3]);

impl RgbColor {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self([r, g, b])
    }
}

impl AddAssign<&RgbColor> for RgbColor {
    fn add_assign(&mut self, rhs: &RgbColor) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl Radiance for RgbColor {
    type Conversion = ();

    fn zero() -> Self {
        Self::default()
    }

    fn scaled(&self, factor: f64) -> Self {
        Self(self.0.map(|c| c * factor))
    }

    fn accumulate(&mut self, other: &Self) {
        *self += other;
    }

    fn shifted(&self, _factor: f64) -> Self {
        *self
    }

    fn to_rgb(&self, _conversion: &(), normalization: f64) -> [u8; 3] {
        quantize(self.0, normalization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite<R: Radiance>(layers: &[(R, f64)]) -> R {
        let mut acc = R::zero();
        for (value, weight) in layers {
            acc.accumulate(&value.scaled(*weight));
        }
        acc
    }

    #[test]
    fn test_rgb_and_spectrum_composite_the_same_way() {
        let rgb = composite(&[(RgbColor::new(100.0, 0.0, 0.0), 0.25), (RgbColor::new(0.0, 40.0, 8.0), 1.0)]);
        assert_eq!(rgb, RgbColor::new(25.0, 40.0, 8.0));

        let spec = composite(&[(Spectrum::flat(4.0), 0.5), (Spectrum::flat(1.0), 2.0)]);
        assert_eq!(spec, Spectrum::flat(4.0));
    }

    #[test]
    fn test_rgb_shift_is_identity() {
        let c = RgbColor::new(1.0, 2.0, 3.0);
        assert_eq!(Radiance::shifted(&c, 1.7), c);
    }

    #[test]
    fn test_rgb_to_rgb_applies_normalization() {
        let c = RgbColor::new(100.0, 200.0, 300.0);
        assert_eq!(c.to_rgb(&(), 1.0), [100, 200, 255]);
        assert_eq!(c.to_rgb(&(), 0.5), [50, 100, 150]);
    }
}
