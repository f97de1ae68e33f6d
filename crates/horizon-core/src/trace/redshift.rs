//! Gravitational redshift between two radii.

/// Wavelength dilation of light emitted at `source_radius` and received at
/// `observer_radius` around a hole of Schwarzschild radius `schwarzschild_radius`.
///
/// ```text
/// z = sqrt((1/rs - 1/r_obs) / (1/rs - 1/r_src))
/// ```
///
/// Pass `f64::INFINITY` as the source for starlight. Equal radii give 1.
pub fn redshift_factor(schwarzschild_radius: f64, source_radius: f64, observer_radius: f64) -> f64 {
    let inv_rs = schwarzschild_radius.recip();
    ((inv_rs - observer_radius.recip()) / (inv_rs - source_radius.recip())).sqrt()
}
