//! End-to-end integration scenarios against a small reference scene.
//!
//! Hole radius 10, disk radius 50 in the z = 0 plane, observer at
//! (-500, 0, 0) looking down +X.

use glam::DVec3;

use horizon_core::scene::{AccretionDisk, BlackHole, Camera, LaunchGeometry, Orientation, Scene, StarField};
use horizon_core::spectrum::{Radiance, RgbColor, Spectrum};
use horizon_core::texture::{AlphaMap, FilterMode, Grid, RgbImage, SpectralImage};
use horizon_core::trace::{IntegrationParams, Termination, redshift_factor, trace_photon, trace_pixel};
use horizon_core::Photon;

const EPSILON: f64 = 1e-9;
const DISK_COLOR: RgbColor = RgbColor::new(200.0, 120.0, 40.0);

fn params() -> IntegrationParams {
    IntegrationParams {
        min_tick: 0.1,
        step_power: 2.0,
        max_step_ratio: 5.0,
        max_steps: 2000,
        enable_redshift: false,
    }
}

fn camera() -> Camera {
    Camera::new(
        DVec3::new(-500.0, 0.0, 0.0),
        Orientation::default(),
        8,
        8,
        Camera::DEFAULT_FOV,
    )
}

/// Sky whose color encodes the texel it came from.
fn gradient_sky() -> RgbImage {
    let grid = Grid::from_fn(90, 180, |row, col| RgbColor::new(row as f64, col as f64, 7.0));
    RgbImage::new(grid).expect("non-empty sky")
}

fn rgb_scene(alpha: u8, sky: RgbImage) -> Scene<RgbImage> {
    let disk_tex = RgbImage::new(Grid::filled(16, 16, DISK_COLOR)).expect("non-empty disk");
    let alpha = AlphaMap::new(Grid::filled(16, 16, alpha)).expect("non-empty alpha");
    Scene::new(
        camera(),
        BlackHole::from_schwarzschild_radius(10.0),
        AccretionDisk::new(50.0, disk_tex, alpha, FilterMode::Bilinear),
        StarField::new(sky, FilterMode::Bilinear),
    )
}

fn assert_rgb_close(actual: RgbColor, expected: RgbColor) {
    for (a, e) in actual.0.iter().zip(expected.0) {
        assert!((a - e).abs() < EPSILON, "{actual:?} != {expected:?}");
    }
}

#[test]
fn test_ray_through_the_center_is_absorbed() {
    let scene = rgb_scene(255, gradient_sky());
    let outcome = trace_pixel(&scene, 4, 4, &params());
    assert_eq!(outcome.termination, Termination::Absorbed);
    assert_eq!(outcome.radiance, RgbColor::zero());
    assert_eq!(outcome.radiance.to_rgb(&(), 1.0), [0, 0, 0]);
}

#[test]
fn test_ray_above_the_disk_escapes_and_samples_outgoing_direction() {
    let scene = rgb_scene(255, gradient_sky());
    let launched = scene.geometry.emit_photon(0, 4);
    let outcome = trace_pixel(&scene, 0, 4, &params());

    assert_eq!(outcome.termination, Termination::Escaped);
    let out = outcome.photon.velocity;
    assert!((out.length() - 1.0).abs() < EPSILON);
    // Slightly bent toward the hole.
    assert!(out.dot(launched.velocity) > 0.99);
    assert!(out.z < launched.velocity.z);
    // Sky looked up along the final velocity, with all alpha left.
    assert_eq!(outcome.remaining_alpha, 1.0);
    assert_rgb_close(outcome.radiance, scene.stars.radiance(out));
}

#[test]
fn test_opaque_disk_stops_compositing() {
    let sky = RgbImage::new(Grid::filled(4, 8, RgbColor::new(1e6, 1e6, 1e6))).expect("sky");
    let scene = rgb_scene(255, sky);
    let photon = Photon::new(DVec3::new(-30.0, 0.0, 400.0), DVec3::NEG_Z);
    let outcome = trace_photon(&scene, photon, &params());

    assert_eq!(outcome.termination, Termination::DiskHit);
    assert!(outcome.remaining_alpha.abs() < EPSILON);
    assert_rgb_close(outcome.radiance, DISK_COLOR);
    let radius = outcome.photon.position.truncate().length();
    assert!(radius > 10.0 && radius < 50.0, "stopped at radius {radius}");
}

#[test]
fn test_translucent_disk_blends_with_the_sky() {
    let sky_color = RgbColor::new(10.0, 20.0, 30.0);
    let sky = RgbImage::new(Grid::filled(4, 8, sky_color)).expect("sky");
    // 51 / 255 = 0.2 opacity.
    let scene = rgb_scene(51, sky);
    let photon = Photon::new(DVec3::new(-30.0, 0.0, 400.0), DVec3::NEG_Z);
    let outcome = trace_photon(&scene, photon, &params());

    assert_eq!(outcome.termination, Termination::Escaped);
    assert!((outcome.remaining_alpha - 0.8).abs() < EPSILON);
    let mut expected = DISK_COLOR.scaled(0.2);
    expected.accumulate(&sky_color.scaled(0.8));
    assert_rgb_close(outcome.radiance, expected);
}

#[test]
fn test_step_landing_on_the_disk_is_counted_once() {
    let sky = RgbImage::new(Grid::filled(4, 8, RgbColor::zero())).expect("sky");
    let scene = rgb_scene(51, sky);
    // The first fixed step ends exactly on z = 0, the second starts there.
    let fixed = IntegrationParams { min_tick: 0.5, step_power: 0.0, ..params() };
    let photon = Photon::new(DVec3::new(-30.0, 0.0, 0.5), DVec3::NEG_Z);
    let outcome = trace_photon(&scene, photon, &fixed);

    assert_eq!(outcome.termination, Termination::Escaped);
    assert!((outcome.remaining_alpha - 0.8).abs() < EPSILON);
    assert_rgb_close(outcome.radiance, RgbColor::new(40.0, 24.0, 8.0));
}

#[test]
fn test_capture_gives_way_to_escape_as_impact_parameter_grows() {
    let scene = rgb_scene(255, gradient_sky());
    let outcomes: Vec<(f64, Termination)> = (0..=30)
        .map(|i| {
            let b = f64::from(i) * 4.0;
            let photon = Photon::new(DVec3::new(-500.0, b, 0.0), DVec3::X);
            (b, trace_photon(&scene, photon, &params()).termination)
        })
        .collect();

    assert_eq!(outcomes[0].1, Termination::Absorbed);
    assert_eq!(outcomes[outcomes.len() - 1].1, Termination::Escaped);

    let first_escape = outcomes
        .iter()
        .position(|(_, t)| *t == Termination::Escaped)
        .expect("some photon escapes");
    for (b, t) in &outcomes[first_escape..] {
        assert_ne!(*t, Termination::Absorbed, "absorbed at b = {b} after escapes began");
    }
}

#[test]
fn test_step_budget_ends_the_path() {
    let scene = rgb_scene(255, gradient_sky());
    let tight = IntegrationParams { max_steps: 3, ..params() };
    let outcome = trace_pixel(&scene, 0, 4, &tight);
    assert_eq!(outcome.termination, Termination::StepExhausted);
    assert_eq!(outcome.steps, 3);
    assert_eq!(outcome.radiance, RgbColor::zero());
}

#[test]
fn test_disk_light_is_redshifted_on_the_way_out() {
    // Disk emits only at 500 nm.
    let bands: Vec<Grid<f32>> = (0..64)
        .map(|i| Grid::filled(8, 8, if i == 24 { 100.0 } else { 0.0 }))
        .collect();
    let disk_tex = SpectralImage::from_bands(380, 700, &bands).expect("aligned bands");
    let sky_bands: Vec<Grid<f32>> = (0..64).map(|_| Grid::filled(4, 8, 0.0)).collect();
    let sky = SpectralImage::from_bands(380, 700, &sky_bands).expect("aligned bands");
    let scene = Scene::new(
        camera(),
        BlackHole::from_schwarzschild_radius(10.0),
        AccretionDisk::new(50.0, disk_tex, AlphaMap::opaque(8, 8).expect("alpha"), FilterMode::Nearest),
        StarField::new(sky, FilterMode::Nearest),
    );

    let photon = Photon::new(DVec3::new(-30.0, 0.0, 400.0), DVec3::NEG_Z);
    let redshifted = trace_photon(&scene, photon, &IntegrationParams { enable_redshift: true, ..params() });
    let plain = trace_photon(&scene, photon, &params());

    assert_eq!(plain.termination, Termination::DiskHit);
    assert_eq!(plain.radiance.values()[100], 100.0);

    assert_eq!(redshifted.termination, Termination::DiskHit);
    let values = redshifted.radiance.values();
    assert_eq!(values[100], 0.0);
    let shifted_power: f64 = values[120..140].iter().sum();
    assert!(shifted_power > 0.0);
    let total: f64 = values.iter().sum();
    assert!((total - shifted_power).abs() < EPSILON);
}

fn single_band(height: usize, width: usize, band: usize) -> SpectralImage {
    let bands: Vec<Grid<f32>> = (0..64)
        .map(|i| Grid::filled(height, width, if i == band { 100.0 } else { 0.0 }))
        .collect();
    SpectralImage::from_bands(380, 700, &bands).expect("aligned bands")
}

#[test]
fn test_starlight_is_blueshifted_toward_the_observer() {
    // Sky emits only at 500 nm; the disk is never reached.
    let dark_disk: Vec<Grid<f32>> = (0..64).map(|_| Grid::filled(8, 8, 0.0)).collect();
    let scene = Scene::new(
        camera(),
        BlackHole::from_schwarzschild_radius(10.0),
        AccretionDisk::new(
            50.0,
            SpectralImage::from_bands(380, 700, &dark_disk).expect("aligned bands"),
            AlphaMap::opaque(8, 8).expect("alpha"),
            FilterMode::Nearest,
        ),
        StarField::new(single_band(4, 8, 24), FilterMode::Nearest),
    );

    let outcome = trace_pixel(&scene, 0, 4, &IntegrationParams { enable_redshift: true, ..params() });
    assert_eq!(outcome.termination, Termination::Escaped);

    let factor = redshift_factor(10.0, f64::INFINITY, 500.0);
    assert!(factor < 1.0);
    let expected = scene.stars.radiance(outcome.photon.velocity).shifted(factor);
    assert_eq!(outcome.radiance, expected);

    // 500 nm arrives near 495 nm: the power leaves bin 100 for bin 99.
    let values = outcome.radiance.values();
    assert_eq!(values[100], 0.0);
    assert!(values[99] > 0.0);
    let total: f64 = values.iter().sum();
    assert!((total - values[99]).abs() < EPSILON);
}

#[test]
fn test_spectrum_shift_by_one_preserves_texture_samples() {
    let bands: Vec<Grid<f32>> = (0..4).map(|i| Grid::filled(2, 2, i as f32 + 1.0)).collect();
    let tex = SpectralImage::from_bands(400, 420, &bands).expect("aligned bands");
    let sky = StarField::new(tex, FilterMode::Bilinear);
    let s: Spectrum = sky.radiance(DVec3::Y);
    assert_eq!(s.shifted(1.0), s);
}
