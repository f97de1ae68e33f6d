//! Per-photon path integration.
//!
//! Each step runs four checks in a fixed order:
//! 1. disk-plane crossing (absorption inside the horizon, or a disk sample),
//! 2. horizon capture,
//! 3. velocity update,
//! 4. escape to the starfield.
//!
//! Radiance is composited front to back: every disk sample consumes part of
//! the remaining alpha, and whatever is left weights the starfield.

use glam::DVec3;

use crate::photon::Photon;
use crate::scene::{BlackHole, LaunchGeometry, Scene};
use crate::spectrum::Radiance;
use crate::texture::TextureSource;

use super::params::IntegrationParams;
use super::redshift::redshift_factor;

/// Remaining alpha below which the path is considered fully covered.
const ALPHA_EPSILON: f64 = 1e-9;

/// How a path ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Crossed into the horizon. Contributes black.
    Absorbed,
    /// Disk samples used up all remaining alpha.
    DiskHit,
    /// Left the scene outward and sampled the starfield.
    Escaped,
    /// Ran out of steps; keeps what was accumulated so far.
    StepExhausted,
}

/// Result of tracing one photon.
#[derive(Debug, Clone)]
pub struct TraceOutcome<R> {
    pub termination: Termination,
    /// Composited radiance.
    pub radiance: R,
    /// Alpha left uncovered by disk samples.
    pub remaining_alpha: f64,
    /// Steps taken, including the terminating one.
    pub steps: u32,
    /// Photon state at termination.
    pub photon: Photon,
}

/// Trace the photon launched for pixel `(row, col)` of the scene's geometry.
pub fn trace_pixel<S, L>(
    scene: &Scene<S, L>,
    row: usize,
    col: usize,
    params: &IntegrationParams,
) -> TraceOutcome<S::Texel>
where
    S: TextureSource,
    S::Texel: Radiance,
    L: LaunchGeometry,
{
    trace_photon(scene, scene.geometry.emit_photon(row, col), params)
}

/// Drive `photon` through the scene until it terminates.
pub fn trace_photon<S, L>(
    scene: &Scene<S, L>,
    mut photon: Photon,
    params: &IntegrationParams,
) -> TraceOutcome<S::Texel>
where
    S: TextureSource,
    S::Texel: Radiance,
    L: LaunchGeometry,
{
    let hole = &scene.hole;
    let observer_radius = scene.observer_radius();
    let shift = |source_radius: f64| {
        if params.enable_redshift {
            redshift_factor(hole.radius(), source_radius, observer_radius)
        } else {
            1.0
        }
    };

    let mut radiance = <S::Texel as Radiance>::zero();
    let mut remaining_alpha = 1.0;
    let mut termination = Termination::StepExhausted;
    let mut steps = 0;

    while steps < params.max_steps {
        steps += 1;
        let r = photon.position.length();
        let dt = params.step_size(r, hole.radius());
        let new_position = photon.position + photon.velocity * dt;

        if let Some(crossing) = plane_crossing(photon.position, new_position) {
            let crossing_radius = crossing.truncate().length();
            if crossing_radius < hole.radius() {
                termination = Termination::Absorbed;
                break;
            }
            if crossing_radius < scene.disk.radius() {
                let used_alpha = scene.disk.opacity(crossing) * remaining_alpha;
                let emitted = scene.disk.radiance(crossing).shifted(shift(crossing.length()));
                radiance.accumulate(&emitted.scaled(used_alpha));
                remaining_alpha -= used_alpha;
                if remaining_alpha <= ALPHA_EPSILON {
                    termination = Termination::DiskHit;
                    break;
                }
            }
        }

        if is_captured(hole, photon.position, new_position) {
            termination = Termination::Absorbed;
            break;
        }

        photon.deflect(new_position, dt, r, hole.gm());

        if photon.is_outbound() && photon.position.length() > 2.0 * scene.disk.radius() {
            let sky = scene.stars.radiance(photon.velocity).shifted(shift(f64::INFINITY));
            radiance.accumulate(&sky.scaled(remaining_alpha));
            termination = Termination::Escaped;
            break;
        }
    }

    tracing::trace!(?termination, steps, "photon finished");
    TraceOutcome {
        termination,
        radiance,
        remaining_alpha,
        steps,
        photon,
    }
}

/// Point where the segment `from → to` meets the z = 0 plane.
///
/// The segment is half-open: a step ending on the plane crosses at `to`, and
/// the next step, starting there, does not cross again. A segment lying
/// entirely in the plane yields `None`.
pub fn plane_crossing(from: DVec3, to: DVec3) -> Option<DVec3> {
    if from.z == 0.0 || to.z * from.z > 0.0 {
        return None;
    }
    let dz = to.z - from.z;
    Some(to * (from.z / dz).abs() + from * (to.z / dz).abs())
}

/// The step `from → to` ends inside the horizon or passes through it.
///
/// A chord longer than the sum of the tangent lengths from both endpoints
/// must cut through the sphere of radius `hole.radius()`.
fn is_captured(hole: &BlackHole, from: DVec3, to: DVec3) -> bool {
    if to.length() < hole.radius() {
        return true;
    }
    let tangents = (to.length_squared() - hole.sqradius()).sqrt()
        + (from.length_squared() - hole.sqradius()).sqrt();
    (to - from).length() > tangents
}
