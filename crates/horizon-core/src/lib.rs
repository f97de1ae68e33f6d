//! Horizon Core: spectral black-hole lensing.
//!
//! This crate contains the photon integrator, the spectral radiance model,
//! texture sampling and the scene description. No file-format or CLI
//! dependencies.

pub mod photon;
pub mod scene;
pub mod spectrum;
pub mod texture;
pub mod trace;

// Re-exports for convenience.
pub use photon::Photon;
pub use scene::{AccretionDisk, BlackHole, Camera, LaunchGeometry, Orientation, Scene, StarField};
pub use spectrum::{MatchingTable, Radiance, RgbColor, Spectrum};
pub use texture::{AlphaMap, FilterMode, Grid, RgbImage, SpectralImage};
pub use trace::{IntegrationParams, RenderedImage, Termination, render, trace_photon, trace_pixel};
