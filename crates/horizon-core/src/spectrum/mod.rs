//! Discretized power spectra and their conversion to display color.
//!
//! A [`Spectrum`] holds [`SPECTRUM_BINS`] power-density samples spaced
//! [`WAVELENGTH_STEP`] apart, starting at wavelength 0. Everything here is
//! linear: accumulation and scaling act sample by sample, and the only
//! non-linear step is the final clamp in [`Spectrum::to_rgb`].

pub mod color;
pub mod radiance;
pub mod table;

use std::ops::{Add, AddAssign, Mul, MulAssign};

use palette::Xyz;
use palette::white_point::D65;

pub use color::{ColorMatrix, XYZ_TO_LINEAR_SRGB, quantize};
pub use radiance::{Radiance, RgbColor};
pub use table::MatchingTable;

/// Distance between two neighbouring spectrum samples, in nanometres.
pub const WAVELENGTH_STEP: u32 = 5;

/// Number of samples in a spectrum. Covers `[0, 1000)` nm.
pub const SPECTRUM_BINS: usize = 200;

/// Errors raised while building spectral resources.
#[derive(Debug, thiserror::Error)]
pub enum SpectrumError {
    #[error("line {line}: expected `<wavelength> <x> <y> <z>`, got {content:?}")]
    MalformedRow { line: usize, content: String },
    #[error("line {line}: wavelength {wavelength} is outside the spectrum grid")]
    WavelengthOutOfGrid { line: usize, wavelength: u32 },
    #[error("line {line}: wavelength {wavelength} is not a multiple of {WAVELENGTH_STEP}")]
    MisalignedWavelength { line: usize, wavelength: u32 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Power spectrum sampled on the fixed wavelength grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spectrum {
    values: [f64; SPECTRUM_BINS],
}

impl Default for Spectrum {
    fn default() -> Self {
        Self::zero()
    }
}

impl Spectrum {
    /// The empty spectrum: no power in any bin.
    pub const fn zero() -> Self {
        Self {
            values: [0.0; SPECTRUM_BINS],
        }
    }

    /// Build a spectrum by evaluating `f` at every bin index.
    pub fn from_fn(f: impl FnMut(usize) -> f64) -> Self {
        Self {
            values: std::array::from_fn(f),
        }
    }

    /// Spectrum with the same power in every bin.
    pub fn flat(value: f64) -> Self {
        Self {
            values: [value; SPECTRUM_BINS],
        }
    }

    /// Raw bin values, bin `i` sitting at wavelength `i * WAVELENGTH_STEP`.
    pub fn values(&self) -> &[f64; SPECTRUM_BINS] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64; SPECTRUM_BINS] {
        &mut self.values
    }

    /// Power density at an arbitrary wavelength.
    ///
    /// Interpolates linearly between the two bracketing bins. Wavelengths
    /// outside `[0, SPECTRUM_BINS * WAVELENGTH_STEP)` yield 0; past the last
    /// bin the missing right neighbour counts as 0.
    pub fn sample_at(&self, wavelength: f64) -> f64 {
        let x = wavelength / f64::from(WAVELENGTH_STEP);
        if !(0.0..SPECTRUM_BINS as f64).contains(&x) {
            return 0.0;
        }
        let left = x.floor() as usize;
        let frac = x - left as f64;
        let right = self.values.get(left + 1).copied().unwrap_or(0.0);
        self.values[left] * (1.0 - frac) + right * frac
    }

    /// Every bin multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = *self;
        out *= factor;
        out
    }

    /// Wavelength dilation by `factor`.
    ///
    /// Bin `i` of the result reads the source at `i * step / factor`, so a
    /// factor above 1 moves power toward longer wavelengths (redshift).
    /// `shifted(1.0)` returns the spectrum unchanged.
    pub fn shifted(&self, factor: f64) -> Self {
        let step = f64::from(WAVELENGTH_STEP);
        Self::from_fn(|i| self.sample_at(i as f64 * step / factor))
    }

    /// CIE tristimulus values: the spectrum weighted by the matching curves.
    pub fn tristimulus(&self, table: &MatchingTable) -> Xyz<D65, f64> {
        let mut xyz = [0.0_f64; 3];
        for (i, &power) in self.values.iter().enumerate() {
            xyz[0] += power * table.x[i];
            xyz[1] += power * table.y[i];
            xyz[2] += power * table.z[i];
        }
        Xyz::new(xyz[0], xyz[1], xyz[2])
    }

    /// Convert to an 8-bit display color.
    ///
    /// Integrates against `table`, maps XYZ to linear sRGB, multiplies by
    /// `normalization` and clamps each channel to `[0, 255]`.
    pub fn to_rgb(&self, table: &MatchingTable, normalization: f64) -> [u8; 3] {
        let rgb = XYZ_TO_LINEAR_SRGB.apply(self.tristimulus(table));
        quantize([rgb.red, rgb.green, rgb.blue], normalization)
    }
}

impl AddAssign<&Spectrum> for Spectrum {
    fn add_assign(&mut self, rhs: &Spectrum) {
        for (a, b) in self.values.iter_mut().zip(rhs.values.iter()) {
            *a += b;
        }
    }
}

impl AddAssign for Spectrum {
    fn add_assign(&mut self, rhs: Spectrum) {
        *self += &rhs;
    }
}

impl Add for Spectrum {
    type Output = Spectrum;

    fn add(mut self, rhs: Spectrum) -> Spectrum {
        self += &rhs;
        self
    }
}

impl MulAssign<f64> for Spectrum {
    fn mul_assign(&mut self, rhs: f64) {
        for v in &mut self.values {
            *v *= rhs;
        }
    }
}

impl Mul<f64> for Spectrum {
    type Output = Spectrum;

    fn mul(mut self, rhs: f64) -> Spectrum {
        self *= rhs;
        self
    }
}
