//! Scene description: the hole, its accretion disk, the sky and the observer.
//!
//! Everything here is read-only once built. The integrator only borrows a
//! [`Scene`], so one instance can be shared by every render worker.

pub mod black_hole;
pub mod camera;

use glam::DVec3;

pub use black_hole::BlackHole;
pub use camera::{Camera, LaunchGeometry, Orientation};

use crate::texture::{AlphaMap, FilterMode, TextureSource, disk_coords, sample, sky_coords};

/// A flat disk in the z = 0 plane, centered at the origin.
///
/// The radiance texture and the opacity map both cover the disk's bounding
/// square. The radius is expected to exceed the hole's, which is left to the
/// caller.
#[derive(Debug, Clone)]
pub struct AccretionDisk<S> {
    radius: f64,
    texture: S,
    alpha: AlphaMap,
    filter: FilterMode,
}

impl<S: TextureSource> AccretionDisk<S> {
    pub fn new(radius: f64, texture: S, alpha: AlphaMap, filter: FilterMode) -> Self {
        Self {
            radius,
            texture,
            alpha,
            filter,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Emitted radiance at a point of the disk plane.
    pub fn radiance(&self, point: DVec3) -> S::Texel {
        let (row, col) = disk_coords(
            point.x,
            point.y,
            self.radius,
            self.texture.height(),
            self.texture.width(),
        );
        sample(&self.texture, self.filter, row, col)
    }

    /// Opacity in `[0, 1]` at a point of the disk plane.
    pub fn opacity(&self, point: DVec3) -> f64 {
        let (row, col) = disk_coords(
            point.x,
            point.y,
            self.radius,
            self.alpha.height(),
            self.alpha.width(),
        );
        sample(&self.alpha, self.filter, row, col) / f64::from(u8::MAX)
    }
}

/// Background radiance over the sphere of directions.
#[derive(Debug, Clone)]
pub struct StarField<S> {
    texture: S,
    filter: FilterMode,
}

impl<S: TextureSource> StarField<S> {
    pub fn new(texture: S, filter: FilterMode) -> Self {
        Self { texture, filter }
    }

    /// Radiance arriving from `direction` (unit length).
    pub fn radiance(&self, direction: DVec3) -> S::Texel {
        let (row, col) = sky_coords(
            direction.to_array(),
            self.texture.height(),
            self.texture.width(),
        );
        sample(&self.texture, self.filter, row, col)
    }
}

/// Everything a render needs besides the integration parameters.
#[derive(Debug, Clone)]
pub struct Scene<S, L = Camera> {
    pub geometry: L,
    pub hole: BlackHole,
    pub disk: AccretionDisk<S>,
    pub stars: StarField<S>,
}

impl<S, L> Scene<S, L>
where
    S: TextureSource,
    L: LaunchGeometry,
{
    pub fn new(geometry: L, hole: BlackHole, disk: AccretionDisk<S>, stars: StarField<S>) -> Self {
        Self {
            geometry,
            hole,
            disk,
            stars,
        }
    }

    /// Distance of the observer from the hole.
    pub fn observer_radius(&self) -> f64 {
        self.geometry.observer().length()
    }
}
