//! Observer geometry: maps output pixels to launch photons.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::photon::Photon;

/// Anything that can launch one photon per output pixel.
pub trait LaunchGeometry: Send + Sync {
    /// `(rows, cols)` of the output image.
    fn resolution(&self) -> (usize, usize);

    /// Position the photons start from.
    fn observer(&self) -> DVec3;

    /// Unit-speed photon for pixel `(row, col)`.
    fn emit_photon(&self, row: usize, col: usize) -> Photon;
}

/// Orientation as intrinsic Tait-Bryan angles, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Rotation about Z.
    pub yaw: f64,
    /// Rotation about Y.
    pub pitch: f64,
    /// Rotation about X.
    pub roll: f64,
}

impl Orientation {
    pub fn from_degrees(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self {
            yaw: yaw.to_radians(),
            pitch: pitch.to_radians(),
            roll: roll.to_radians(),
        }
    }

    /// Rotation taking camera-space directions to world space.
    pub fn to_quat(self) -> DQuat {
        let yaw = DQuat::from_axis_angle(DVec3::Z, self.yaw);
        let pitch = DQuat::from_axis_angle(DVec3::Y, self.pitch);
        let roll = DQuat::from_axis_angle(DVec3::X, self.roll);
        (roll * pitch * yaw).conjugate()
    }
}

/// Pinhole camera looking down its local +X axis.
///
/// The image plane sits at a fixed distance so that the horizontal field of
/// view spans `fov`; +Y is image left and +Z image up.
#[derive(Debug, Clone)]
pub struct Camera {
    position: DVec3,
    rotation: DQuat,
    rows: usize,
    cols: usize,
    fov: f64,
}

impl Camera {
    pub const DEFAULT_FOV: f64 = std::f64::consts::FRAC_PI_2;

    pub fn new(position: DVec3, orientation: Orientation, rows: usize, cols: usize, fov: f64) -> Self {
        Self {
            position,
            rotation: orientation.to_quat(),
            rows,
            cols,
            fov,
        }
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }
}

impl LaunchGeometry for Camera {
    fn resolution(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn observer(&self) -> DVec3 {
        self.position
    }

    fn emit_photon(&self, row: usize, col: usize) -> Photon {
        let rows = self.rows as f64;
        let cols = self.cols as f64;
        let local = DVec3::new(
            cols / (self.fov / 2.0).tan(),
            cols - 2.0 * col as f64,
            rows - 2.0 * row as f64,
        );
        Photon::new(self.position, self.rotation * local.normalize())
    }
}
