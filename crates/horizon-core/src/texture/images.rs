//! Concrete textures: multi-band spectral, tri-channel and opacity.

use super::{Grid, TextureError, TextureSource};
use crate::spectrum::{RgbColor, SPECTRUM_BINS, Spectrum, WAVELENGTH_STEP};

/// A texture holding one spectrum per texel.
///
/// Only the bands that were actually supplied are stored; every other bin of
/// a texel's spectrum reads as zero.
#[derive(Debug, Clone)]
pub struct SpectralImage {
    height: usize,
    width: usize,
    first_bin: usize,
    bands: usize,
    /// Texel-major: the bands of one texel are contiguous.
    samples: Vec<f32>,
}

impl SpectralImage {
    /// Assemble a spectral image from one grayscale grid per wavelength.
    ///
    /// `bands[i]` holds the power at `first_wavelength + i * WAVELENGTH_STEP`;
    /// the range ends before `last_wavelength`. Both endpoints must sit on
    /// the wavelength grid and all bands must share one size.
    pub fn from_bands(
        first_wavelength: u32,
        last_wavelength: u32,
        bands: &[Grid<f32>],
    ) -> Result<Self, TextureError> {
        if first_wavelength % WAVELENGTH_STEP != 0 || last_wavelength % WAVELENGTH_STEP != 0 {
            return Err(TextureError::MisalignedRange {
                first: first_wavelength,
                last: last_wavelength,
                step: WAVELENGTH_STEP,
            });
        }
        let first_bin = (first_wavelength / WAVELENGTH_STEP) as usize;
        let last_bin = (last_wavelength / WAVELENGTH_STEP) as usize;
        if last_bin <= first_bin || last_bin > SPECTRUM_BINS {
            return Err(TextureError::RangeOutOfGrid {
                first: first_wavelength,
                last: last_wavelength,
            });
        }
        let band_count = last_bin - first_bin;
        if bands.len() != band_count {
            return Err(TextureError::BandCountMismatch {
                expected: band_count,
                actual: bands.len(),
            });
        }

        let height = bands[0].height();
        let width = bands[0].width();
        if height == 0 || width == 0 {
            return Err(TextureError::Empty);
        }
        for (band, grid) in bands.iter().enumerate() {
            if grid.height() != height || grid.width() != width {
                return Err(TextureError::BandSizeMismatch {
                    band,
                    height,
                    width,
                    actual_height: grid.height(),
                    actual_width: grid.width(),
                });
            }
        }

        let mut samples = Vec::with_capacity(height * width * band_count);
        for texel in 0..height * width {
            samples.extend(bands.iter().map(|grid| grid.as_slice()[texel]));
        }

        Ok(Self {
            height,
            width,
            first_bin,
            bands: band_count,
            samples,
        })
    }

    /// The wavelength range covered by stored bands, `[first, last)`.
    pub fn wavelength_range(&self) -> (u32, u32) {
        let step = WAVELENGTH_STEP as usize;
        ((self.first_bin * step) as u32, ((self.first_bin + self.bands) * step) as u32)
    }
}

impl TextureSource for SpectralImage {
    type Texel = Spectrum;

    fn height(&self) -> usize {
        self.height
    }

    fn width(&self) -> usize {
        self.width
    }

    fn texel(&self, row: usize, col: usize) -> Spectrum {
        let row = row.min(self.height - 1);
        let col = col % self.width;
        let start = (row * self.width + col) * self.bands;
        let mut spectrum = Spectrum::zero();
        let bins = &mut spectrum.values_mut()[self.first_bin..self.first_bin + self.bands];
        for (bin, &power) in bins.iter_mut().zip(&self.samples[start..start + self.bands]) {
            *bin = f64::from(power);
        }
        spectrum
    }
}

/// A tri-channel radiance texture.
#[derive(Debug, Clone)]
pub struct RgbImage {
    grid: Grid<RgbColor>,
}

impl RgbImage {
    pub fn new(grid: Grid<RgbColor>) -> Result<Self, TextureError> {
        ensure_non_empty(&grid)?;
        Ok(Self { grid })
    }
}

impl TextureSource for RgbImage {
    type Texel = RgbColor;

    fn height(&self) -> usize {
        self.grid.height()
    }

    fn width(&self) -> usize {
        self.grid.width()
    }

    fn texel(&self, row: usize, col: usize) -> RgbColor {
        self.grid.at_clamped(row, col).copied().unwrap_or_default()
    }
}

/// An 8-bit opacity map. Texels read as `0.0..=255.0`.
#[derive(Debug, Clone)]
pub struct AlphaMap {
    grid: Grid<u8>,
}

impl AlphaMap {
    pub fn new(grid: Grid<u8>) -> Result<Self, TextureError> {
        ensure_non_empty(&grid)?;
        Ok(Self { grid })
    }

    /// Fully opaque map of the given size.
    pub fn opaque(height: usize, width: usize) -> Result<Self, TextureError> {
        Self::new(Grid::filled(height, width, u8::MAX))
    }
}

impl TextureSource for AlphaMap {
    type Texel = f64;

    fn height(&self) -> usize {
        self.grid.height()
    }

    fn width(&self) -> usize {
        self.grid.width()
    }

    fn texel(&self, row: usize, col: usize) -> f64 {
        f64::from(self.grid.at_clamped(row, col).copied().unwrap_or_default())
    }
}

fn ensure_non_empty<T>(grid: &Grid<T>) -> Result<(), TextureError> {
    if grid.height() == 0 || grid.width() == 0 {
        return Err(TextureError::Empty);
    }
    Ok(())
}
