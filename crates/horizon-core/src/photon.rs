//! A light quantum traced backwards from the observer.

use glam::DVec3;

/// Position and velocity in light-seconds with c = 1.
///
/// `velocity` has unit length at every step boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photon {
    pub position: DVec3,
    pub velocity: DVec3,
}

impl Photon {
    /// Launch from `position` along `direction`, normalized to unit speed.
    pub fn new(position: DVec3, direction: DVec3) -> Self {
        Self {
            position,
            velocity: direction.normalize(),
        }
    }

    /// Move to `new_position` and bend the velocity toward the origin.
    ///
    /// `dt` is the step just taken and `r` the distance from the origin at
    /// its start. The pull `dv0` is applied as a rotation: its component
    /// along the half-step velocity `h` is removed so speed stays at 1,
    /// then the result is renormalized to absorb rounding drift.
    pub fn deflect(&mut self, new_position: DVec3, dt: f64, r: f64, gm: f64) {
        self.position = new_position;
        let dv0 = self.position.normalize() * (dt * gm / -(r * r));
        let h = self.velocity + dv0 / 2.0;
        self.velocity += dv0 - h * (dv0.dot(h) / h.dot(h));
        self.velocity = self.velocity.normalize();
    }

    /// Moving away from the origin.
    pub fn is_outbound(&self) -> bool {
        self.velocity.dot(self.position) > 0.0
    }
}
