//! The gravitating body.

/// Speed of light in m/s. Integration units are light-seconds with c = 1.
pub const SPEED_OF_LIGHT: f64 = 3e8;

/// A non-rotating, uncharged black hole centered at the origin.
///
/// All fields are derived once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackHole {
    gm: f64,
    radius: f64,
    sqradius: f64,
}

impl BlackHole {
    /// Build from the standard gravitational parameter `GM` in m³/s².
    ///
    /// In light-seconds, `GM / c²` metres becomes `GM / c³`.
    pub fn new(gm_si: f64) -> Self {
        Self::from_gm(gm_si / (SPEED_OF_LIGHT * SPEED_OF_LIGHT * SPEED_OF_LIGHT))
    }

    /// Build from `GM` already expressed in integration units.
    pub fn from_gm(gm: f64) -> Self {
        let radius = 2.0 * gm;
        Self {
            gm,
            radius,
            sqradius: radius * radius,
        }
    }

    /// Build from the Schwarzschild radius in integration units.
    pub fn from_schwarzschild_radius(radius: f64) -> Self {
        Self::from_gm(radius / 2.0)
    }

    /// Gravitational parameter in integration units.
    pub fn gm(&self) -> f64 {
        self.gm
    }

    /// Schwarzschild (capture) radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Square of the capture radius.
    pub fn sqradius(&self) -> f64 {
        self.sqradius
    }
}
