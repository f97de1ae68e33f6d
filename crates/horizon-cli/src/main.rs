//! Horizon: renders a black hole with an accretion disk against a
//! starfield.
//!
//! Reads a scene configuration, loads textures, traces every pixel and writes
//! a PNG.

mod config;
mod texture_loader;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use horizon_core::scene::{AccretionDisk, BlackHole, LaunchGeometry, Scene, StarField};
use horizon_core::texture::Grid;
use horizon_core::trace::{IntegrationParams, RenderError, RenderedImage, render};
use tracing_subscriber::EnvFilter;

use config::{ConfigError, SceneConfig};
use texture_loader::{FIRST_WAVELENGTH, LAST_WAVELENGTH, LoadError, TexturePaths};

const DEFAULT_OUTPUT: &str = "out.png";
/// Scale from integrated XYZ to 8-bit display values for spectral renders.
const SPECTRAL_NORMALIZATION: f64 = 0.07;
const RGB_NORMALIZATION: f64 = 1.0;

#[derive(Parser)]
#[command(name = "horizon")]
#[command(version)]
#[command(about = "Spectral ray tracer for a Schwarzschild black hole", long_about = None)]
struct Args {
    /// Scene configuration (JSON or flat text)
    config: PathBuf,
    /// Output PNG, overriding the one named in the config
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Render from RGB textures instead of spectral bands
    #[arg(long)]
    rgb: bool,
    /// Worker threads (defaults to one per core)
    #[arg(short = 'j', long)]
    threads: Option<usize>,
    /// Multiplier applied before quantizing to 8 bits
    #[arg(long)]
    normalization: Option<f64>,
    /// Directory holding the texture set
    #[arg(long, default_value = "textures")]
    textures: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    }

    let config = SceneConfig::load(&args.config)?;
    let hole = config.black_hole();
    tracing::info!("Schwarzschild radius: {} LS", hole.radius());

    let camera = config.camera();
    let params = integration_params(&config, &hole, camera.observer().length(), args.rgb);
    let disk_radius = hole.radius() * config.disk_size_ratio;
    let paths = TexturePaths::under(&args.textures);

    tracing::info!("Loading textures from {}", args.textures.display());
    let image = if args.rgb {
        let disk = AccretionDisk::new(
            disk_radius,
            texture_loader::load_rgb(&paths.disk_rgb)?,
            texture_loader::load_alpha(&paths.disk_alpha)?,
            config.filter,
        );
        let stars = StarField::new(texture_loader::load_rgb(&paths.stars_rgb)?, config.filter);
        let scene = Scene::new(camera, hole, disk, stars);
        render(&scene, &params, &(), args.normalization.unwrap_or(RGB_NORMALIZATION))?
    } else {
        let disk = AccretionDisk::new(
            disk_radius,
            texture_loader::load_spectral(&paths.disk_bands, FIRST_WAVELENGTH, LAST_WAVELENGTH)?,
            texture_loader::load_alpha(&paths.disk_alpha)?,
            config.filter,
        );
        let stars = StarField::new(
            texture_loader::load_spectral(&paths.star_bands, FIRST_WAVELENGTH, LAST_WAVELENGTH)?,
            config.filter,
        );
        let table = texture_loader::load_matching_table(&paths.matching_table)?;
        let scene = Scene::new(camera, hole, disk, stars);
        render(&scene, &params, &table, args.normalization.unwrap_or(SPECTRAL_NORMALIZATION))?
    };

    let output = args
        .output
        .clone()
        .or(config.output)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    tracing::info!("Saving image to {}", output.display());
    write_png(&output, &image)
}

/// Integration parameters for the configured scene. RGB textures carry no
/// wavelength axis, so redshift is switched off for them.
fn integration_params(
    config: &SceneConfig,
    hole: &BlackHole,
    observer_radius: f64,
    rgb: bool,
) -> IntegrationParams {
    if rgb && config.redshift {
        tracing::warn!("redshift has no effect on RGB textures; rendering without it");
    }
    IntegrationParams {
        enable_redshift: config.redshift && !rgb,
        ..IntegrationParams::tuned_for(hole, observer_radius)
    }
}

fn write_png(path: &Path, image: &RenderedImage) -> Result<(), CliError> {
    let pixels: &Grid<[u8; 3]> = &image.pixels;
    let buffer = image::RgbImage::from_raw(
        pixels.width() as u32,
        pixels.height() as u32,
        pixels.as_bytes().to_vec(),
    )
    .ok_or(CliError::OutputSize {
        width: pixels.width(),
        height: pixels.height(),
    })?;
    buffer.save(path).map_err(|source| CliError::Encode {
        path: path.to_path_buf(),
        source,
    })
}

/// Top-level failure, mapped to a sysexits-style exit code.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("bad config: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to load textures: {0}")]
    Load(#[from] LoadError),
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    #[error("failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("image of {width}x{height} does not fit an RGB buffer")]
    OutputSize { width: usize, height: usize },
    #[error("failed to write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 65,
            Self::Load(_) => 66,
            Self::Render(_) | Self::ThreadPool(_) | Self::OutputSize { .. } => 70,
            Self::Encode { .. } => 73,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["horizon", "scene.json", "-o", "a.png", "--rgb", "-j", "4"])
            .expect("valid args");
        assert_eq!(args.config, PathBuf::from("scene.json"));
        assert_eq!(args.output, Some(PathBuf::from("a.png")));
        assert!(args.rgb);
        assert_eq!(args.threads, Some(4));
        assert_eq!(args.normalization, None);
        assert_eq!(args.textures, PathBuf::from("textures"));
    }

    #[test]
    fn test_bad_config_exits_65() {
        let err = CliError::from(ConfigError::MissingField("gm"));
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_missing_config_file() {
        let args = Args::try_parse_from(["horizon", "/nonexistent/horizon-scene.txt"]).expect("valid args");
        let err = run(&args).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::Read { .. })));
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_rgb_render_disables_redshift() {
        let config = SceneConfig { redshift: true, ..Default::default() };
        let hole = config.black_hole();
        let observer = config.camera().observer().length();

        let spectral = integration_params(&config, &hole, observer, false);
        assert!(spectral.enable_redshift);
        let rgb = integration_params(&config, &hole, observer, true);
        assert!(!rgb.enable_redshift);
        assert_eq!(rgb.max_steps, spectral.max_steps);
    }

    #[test]
    fn test_write_png_roundtrip() {
        let pixels = Grid::from_fn(3, 5, |row, col| [row as u8, col as u8, 9]);
        let image = RenderedImage { pixels, stats: Default::default() };
        let path = std::env::temp_dir().join(format!("horizon-out-{}.png", std::process::id()));
        write_png(&path, &image).expect("write");
        let decoded = image::open(&path).expect("decode").to_rgb8();
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(decoded.get_pixel(4, 2).0, [2, 4, 9]);
        std::fs::remove_file(&path).ok();
    }
}
