//! Texture loading from image files.
//!
//! Spectral textures are stacks of grayscale images, one per wavelength,
//! named by a pattern with a `{}` placeholder for the wavelength in
//! nanometres. Pixel values are used as-is (0-255).

use std::path::{Path, PathBuf};

use horizon_core::spectrum::{MatchingTable, RgbColor, SpectrumError, WAVELENGTH_STEP};
use horizon_core::texture::{AlphaMap, Grid, RgbImage, SpectralImage, TextureError};

/// First wavelength with a texture band.
pub const FIRST_WAVELENGTH: u32 = 380;
/// End of the band range (exclusive).
pub const LAST_WAVELENGTH: u32 = 700;

/// File locations of every texture a render may need.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturePaths {
    pub disk_bands: String,
    pub star_bands: String,
    pub disk_alpha: PathBuf,
    pub disk_rgb: PathBuf,
    pub stars_rgb: PathBuf,
    pub matching_table: PathBuf,
}

impl TexturePaths {
    /// Standard layout under `root`.
    pub fn under(root: &Path) -> Self {
        let spectral = root.join("spectral");
        Self {
            disk_bands: spectral.join("disk").join("{}.png").to_string_lossy().into_owned(),
            star_bands: spectral.join("stars").join("{}.png").to_string_lossy().into_owned(),
            disk_alpha: root.join("disk_alpha.png"),
            disk_rgb: root.join("disk.png"),
            stars_rgb: root.join("stars.png"),
            matching_table: spectral.join("cie_xyz.txt"),
        }
    }
}

impl Default for TexturePaths {
    fn default() -> Self {
        Self::under(Path::new("textures"))
    }
}

/// Substitute `wavelength` into a band filename pattern.
pub fn band_path(pattern: &str, wavelength: u32) -> Result<PathBuf, LoadError> {
    if !pattern.contains("{}") {
        return Err(LoadError::MissingPlaceholder(pattern.to_owned()));
    }
    Ok(PathBuf::from(pattern.replace("{}", &wavelength.to_string())))
}

/// Load one grayscale band per wavelength in `[first, last)` and assemble
/// them into a spectral texture.
pub fn load_spectral(pattern: &str, first: u32, last: u32) -> Result<SpectralImage, LoadError> {
    let mut bands = Vec::new();
    let mut wavelength = first;
    while wavelength < last {
        let path = band_path(pattern, wavelength)?;
        let gray = open(&path)?.to_luma8();
        let (width, height) = gray.dimensions();
        let samples = gray.pixels().map(|p| f32::from(p.0[0])).collect();
        bands.push(Grid::from_vec(height as usize, width as usize, samples)?);
        wavelength += WAVELENGTH_STEP;
    }
    let image = SpectralImage::from_bands(first, last, &bands)?;
    tracing::debug!("loaded {} bands from {pattern}", bands.len());
    Ok(image)
}

/// Load a grayscale opacity map.
pub fn load_alpha(path: &Path) -> Result<AlphaMap, LoadError> {
    Ok(AlphaMap::new(gray_grid(&open(path)?.to_luma8())?)?)
}

/// Load a tri-channel texture for the RGB pipeline.
pub fn load_rgb(path: &Path) -> Result<RgbImage, LoadError> {
    Ok(RgbImage::new(rgb_grid(&open(path)?.to_rgb8())?)?)
}

pub fn load_matching_table(path: &Path) -> Result<MatchingTable, LoadError> {
    Ok(MatchingTable::load(path)?)
}

/// Grayscale image as a texel grid. Image rows become grid rows.
pub fn gray_grid(image: &image::GrayImage) -> Result<Grid<u8>, TextureError> {
    let (width, height) = image.dimensions();
    Grid::from_vec(height as usize, width as usize, image.as_raw().clone())
}

/// RGB image as a grid of 0-255 colors.
pub fn rgb_grid(image: &image::RgbImage) -> Result<Grid<RgbColor>, TextureError> {
    let (width, height) = image.dimensions();
    let cells = image
        .pixels()
        .map(|p| RgbColor::new(f64::from(p.0[0]), f64::from(p.0[1]), f64::from(p.0[2])))
        .collect();
    Grid::from_vec(height as usize, width as usize, cells)
}

fn open(path: &Path) -> Result<image::DynamicImage, LoadError> {
    image::open(path).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Errors that can occur while loading textures.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("band pattern {0:?} has no `{{}}` placeholder")]
    MissingPlaceholder(String),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("color-matching table: {0}")]
    Table(#[from] SpectrumError),
}
