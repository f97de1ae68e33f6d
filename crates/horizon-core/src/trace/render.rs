//! Whole-image rendering.
//!
//! Rows are traced in parallel. Each worker owns a disjoint row of the output
//! buffer and its own [`RenderStats`]; the partial statistics are merged by
//! the parallel reduction, so no counter is ever shared between workers.

use std::time::Instant;

use rayon::prelude::*;

use super::RenderError;
use super::integrator::{Termination, TraceOutcome, trace_pixel};
use super::params::IntegrationParams;
use crate::scene::{LaunchGeometry, Scene};
use crate::spectrum::Radiance;
use crate::texture::{Grid, TextureSource};

/// Per-render counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub pixels: u64,
    pub total_steps: u64,
    pub absorbed: u64,
    pub disk_hits: u64,
    pub escaped: u64,
    pub exhausted: u64,
}

impl RenderStats {
    /// Count one finished path.
    pub fn record<R>(&mut self, outcome: &TraceOutcome<R>) {
        self.pixels += 1;
        self.total_steps += u64::from(outcome.steps);
        match outcome.termination {
            Termination::Absorbed => self.absorbed += 1,
            Termination::DiskHit => self.disk_hits += 1,
            Termination::Escaped => self.escaped += 1,
            Termination::StepExhausted => self.exhausted += 1,
        }
    }

    /// Combine counters from two disjoint sets of pixels.
    pub fn merge(self, other: Self) -> Self {
        Self {
            pixels: self.pixels + other.pixels,
            total_steps: self.total_steps + other.total_steps,
            absorbed: self.absorbed + other.absorbed,
            disk_hits: self.disk_hits + other.disk_hits,
            escaped: self.escaped + other.escaped,
            exhausted: self.exhausted + other.exhausted,
        }
    }

    pub fn average_steps(&self) -> f64 {
        if self.pixels == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.pixels as f64
        }
    }
}

/// 8-bit output image with the statistics of the run that produced it.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub pixels: Grid<[u8; 3]>,
    pub stats: RenderStats,
}

/// Trace every pixel of `scene` and convert the result to display color.
///
/// `conversion` and `normalization` are handed to
/// [`Radiance::to_rgb`] for each pixel.
pub fn render<S, L>(
    scene: &Scene<S, L>,
    params: &IntegrationParams,
    conversion: &<S::Texel as Radiance>::Conversion,
    normalization: f64,
) -> Result<RenderedImage, RenderError>
where
    S: TextureSource,
    S::Texel: Radiance,
    L: LaunchGeometry,
{
    let (rows, cols) = scene.geometry.resolution();
    if rows == 0 || cols == 0 {
        return Err(RenderError::EmptyImage { rows, cols });
    }

    tracing::info!(
        "Rendering {}x{}: min_tick={}, step_power={}, max_steps={}, redshift={}",
        cols,
        rows,
        params.min_tick,
        params.step_power,
        params.max_steps,
        params.enable_redshift
    );
    let started = Instant::now();

    let mut pixels = vec![[0u8; 3]; rows * cols];
    let stats = pixels
        .par_chunks_mut(cols)
        .enumerate()
        .map(|(row, out)| {
            let mut stats = RenderStats::default();
            for (col, px) in out.iter_mut().enumerate() {
                let outcome = trace_pixel(scene, row, col, params);
                *px = outcome.radiance.to_rgb(conversion, normalization);
                stats.record(&outcome);
            }
            tracing::debug!("row {row} done");
            stats
        })
        .reduce(RenderStats::default, RenderStats::merge);

    tracing::info!(
        "Done in {:.2}s. Avg steps/px: {:.1} (absorbed {}, disk {}, escaped {}, exhausted {})",
        started.elapsed().as_secs_f64(),
        stats.average_steps(),
        stats.absorbed,
        stats.disk_hits,
        stats.escaped,
        stats.exhausted
    );

    Ok(RenderedImage {
        pixels: Grid::from_vec(rows, cols, pixels)?,
        stats,
    })
}
