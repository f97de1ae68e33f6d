//! Photon path integration and image rendering.

pub mod integrator;
pub mod params;
pub mod redshift;
pub mod render;

pub use integrator::{Termination, TraceOutcome, plane_crossing, trace_photon, trace_pixel};
pub use params::IntegrationParams;
pub use redshift::redshift_factor;
pub use render::{RenderStats, RenderedImage, render};

use crate::texture::TextureError;

/// Errors raised by [`render`].
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("resolution {rows}x{cols} has no pixels")]
    EmptyImage { rows: usize, cols: usize },
    #[error("output buffer: {0}")]
    Buffer(#[from] TextureError),
}
