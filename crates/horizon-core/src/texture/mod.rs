//! Texture storage and filtered lookup.
//!
//! A [`TextureSource`] is anything that can hand out texels by integer
//! `(row, col)`. [`sample`] turns fractional texture coordinates into a value
//! using one of two [`FilterMode`]s; the same code path serves radiance
//! textures and the scalar opacity map.
//!
//! # Coordinate policy
//! Rows past either edge are clamped to the nearest valid row. Columns wrap
//! around the width, which keeps the starfield seamless across the yaw seam.

pub mod grid;
pub mod images;

use serde::{Deserialize, Serialize};

pub use grid::Grid;
pub use images::{AlphaMap, RgbImage, SpectralImage};

use crate::spectrum::{RgbColor, Spectrum};

/// Errors raised while building textures. Fatal: they surface before any
/// rendering starts.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture has no texels")]
    Empty,
    #[error("expected {expected} texels, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("wavelength range {first}..{last} is not aligned to the {step} nm grid")]
    MisalignedRange { first: u32, last: u32, step: u32 },
    #[error("wavelength range {first}..{last} does not fit the spectrum grid")]
    RangeOutOfGrid { first: u32, last: u32 },
    #[error("expected {expected} wavelength bands, got {actual}")]
    BandCountMismatch { expected: usize, actual: usize },
    #[error("band {band} is {actual_height}x{actual_width}, expected {height}x{width}")]
    BandSizeMismatch {
        band: usize,
        height: usize,
        width: usize,
        actual_height: usize,
        actual_width: usize,
    },
}

/// Texel filtering mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Round to the nearest texel.
    #[default]
    Nearest,
    /// Blend the four surrounding texels by their fractional offsets.
    Bilinear,
}

/// Values that can be blended by bilinear filtering.
pub trait Blend: Sized {
    /// Weighted sum of texels. Weights add up to one.
    fn blend(texels: [(Self, f64); 4]) -> Self;
}

impl Blend for f64 {
    fn blend(texels: [(Self, f64); 4]) -> Self {
        texels.iter().map(|(v, w)| v * w).sum()
    }
}

impl Blend for Spectrum {
    fn blend(texels: [(Self, f64); 4]) -> Self {
        let mut out = Spectrum::zero();
        for (texel, weight) in &texels {
            out += texel.scaled(*weight);
        }
        out
    }
}

impl Blend for RgbColor {
    fn blend(texels: [(Self, f64); 4]) -> Self {
        let mut out = RgbColor::default();
        for (texel, weight) in &texels {
            for (acc, c) in out.0.iter_mut().zip(texel.0) {
                *acc += c * weight;
            }
        }
        out
    }
}

/// Integer-addressed texel provider.
pub trait TextureSource: Send + Sync {
    type Texel: Blend;

    fn height(&self) -> usize;
    fn width(&self) -> usize;

    /// Texel at `(row, col)`, row clamped and column wrapped.
    fn texel(&self, row: usize, col: usize) -> Self::Texel;
}

/// Look up `texture` at fractional coordinates.
pub fn sample<T: TextureSource + ?Sized>(
    texture: &T,
    filter: FilterMode,
    row: f64,
    col: f64,
) -> T::Texel {
    match filter {
        FilterMode::Nearest => texture.texel(to_index(row.round()), to_index(col.round())),
        FilterMode::Bilinear => sample_bilinear(texture, row, col),
    }
}

fn sample_bilinear<T: TextureSource + ?Sized>(texture: &T, row: f64, col: f64) -> T::Texel {
    let height = texture.height();
    let width = texture.width();

    let row = if row.is_nan() { 0.0 } else { row.clamp(0.0, (height - 1) as f64) };
    let rf = to_index(row.floor());
    let cf = to_index(col.floor()) % width;
    let rc = (rf + 1) % height;
    let cc = (cf + 1) % width;

    let rr = fraction(row, rf);
    let cr = fraction(col, cf);

    T::Texel::blend([
        (texture.texel(rc, cc), rr * cr),
        (texture.texel(rc, cf), rr * (1.0 - cr)),
        (texture.texel(rf, cc), cr * (1.0 - rr)),
        (texture.texel(rf, cf), (1.0 - rr) * (1.0 - cr)),
    ])
}

/// Non-negative integer part, NaN and negatives land on 0.
fn to_index(v: f64) -> usize {
    if v > 0.0 { v as usize } else { 0 }
}

/// Offset of `v` past `base`, kept within `[0, 1]`.
fn fraction(v: f64, base: usize) -> f64 {
    let f = v - base as f64;
    if f.is_nan() { 0.0 } else { f.clamp(0.0, 1.0) }
}

/// Texture coordinates of a disk-plane point on a disk of radius `radius`.
///
/// `x` runs along rows and `y` along columns; the disk's bounding square
/// fills the texture.
pub fn disk_coords(x: f64, y: f64, radius: f64, height: usize, width: usize) -> (f64, f64) {
    let row = (height - 1) as f64 * (x / (2.0 * radius) + 0.5);
    let col = (width - 1) as f64 * (y / (2.0 * radius) + 0.5);
    (row, col)
}

/// Texture coordinates of a unit direction on an equirectangular sky map.
///
/// Pitch maps to rows (zenith at row 0), yaw to columns. The column is
/// wrapped into `[0, width)`.
pub fn sky_coords(direction: [f64; 3], height: usize, width: usize) -> (f64, f64) {
    let [x, y, z] = direction;
    let pitch = z.clamp(-1.0, 1.0).asin() / std::f64::consts::PI;
    let yaw = x.atan2(y) / std::f64::consts::TAU;
    let row = (height - 1) as f64 * (0.5 - pitch);
    let col = ((width - 1) as f64 * (0.5 + yaw)).rem_euclid(width as f64);
    (row, col)
}
