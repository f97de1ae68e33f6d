//! Scene configuration for the renderer.
//!
//! Two formats are accepted. A JSON object with the fields of
//! [`SceneConfig`] (missing fields fall back to the defaults), or the flat
//! text format:
//!
//! ```text
//! <GM> <disk size ratio>
//! <x> <y> <z>
//! <yaw> <pitch> <roll>
//! <fov> <width> <height>
//! <redshift 0|1> <bilinear 0|1>
//! [output file]
//! ```
//!
//! Angles are in degrees, GM in SI units, positions in light-seconds.

use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;

use glam::DVec3;
use horizon_core::scene::{BlackHole, Camera, Orientation};
use horizon_core::texture::FilterMode;
use serde::{Deserialize, Serialize};

/// GM of a ~4 million solar mass hole, in m³/s².
const DEFAULT_GM: f64 = 5.3e26;
const DEFAULT_DISK_RATIO: f64 = 8.0;
const DEFAULT_FOV_DEGREES: f64 = 90.0;
const DEFAULT_WIDTH: usize = 640;
const DEFAULT_HEIGHT: usize = 360;

/// Everything needed to set up a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Gravitational parameter GM in SI units.
    pub gm: f64,
    /// Disk radius as a multiple of the Schwarzschild radius.
    pub disk_size_ratio: f64,
    /// Observer position in light-seconds.
    pub position: [f64; 3],
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
    /// Horizontal field of view in degrees.
    pub fov: f64,
    pub width: usize,
    pub height: usize,
    pub redshift: bool,
    pub filter: FilterMode,
    /// Output image path. The command line overrides it.
    pub output: Option<PathBuf>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gm: DEFAULT_GM,
            disk_size_ratio: DEFAULT_DISK_RATIO,
            position: [-1500.0, 0.0, 250.0],
            yaw: 0.0,
            pitch: 10.0,
            roll: 0.0,
            fov: DEFAULT_FOV_DEGREES,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            redshift: true,
            filter: FilterMode::Bilinear,
            output: None,
        }
    }
}

impl SceneConfig {
    /// Read a configuration file, picking the format from its content.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text)?;
        tracing::debug!("loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Parse either format. Text starting with `{` is JSON.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config = if text.trim_start().starts_with('{') {
            serde_json::from_str(text)?
        } else {
            Self::parse_legacy(text)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse the flat text format. Line breaks carry no meaning; values are
    /// read in order.
    pub fn parse_legacy(text: &str) -> Result<Self, ConfigError> {
        let mut fields = Fields(text.split_whitespace());
        let gm = fields.number("gm")?;
        let disk_size_ratio = fields.number("disk_size_ratio")?;
        let position = [fields.number("x")?, fields.number("y")?, fields.number("z")?];
        let yaw = fields.number("yaw")?;
        let pitch = fields.number("pitch")?;
        let roll = fields.number("roll")?;
        let fov = fields.number("fov")?;
        let width = fields.count("width")?;
        let height = fields.count("height")?;
        let redshift = fields.flag("redshift")?;
        let filter = if fields.flag("bilinear")? {
            FilterMode::Bilinear
        } else {
            FilterMode::Nearest
        };
        let output = fields.0.next().map(PathBuf::from);

        Ok(Self {
            gm,
            disk_size_ratio,
            position,
            yaw,
            pitch,
            roll,
            fov,
            width,
            height,
            redshift,
            filter,
            output,
        })
    }

    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gm.is_finite() && self.gm > 0.0) {
            return Err(ConfigError::OutOfRange { field: "gm", reason: "must be positive" });
        }
        if !(self.disk_size_ratio.is_finite() && self.disk_size_ratio > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "disk_size_ratio",
                reason: "must be positive",
            });
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ConfigError::OutOfRange {
                field: "fov",
                reason: "must lie strictly between 0 and 180 degrees",
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::OutOfRange {
                field: "width/height",
                reason: "must be non-zero",
            });
        }
        if self.position.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::OutOfRange { field: "position", reason: "must be finite" });
        }
        Ok(())
    }

    pub fn black_hole(&self) -> BlackHole {
        BlackHole::new(self.gm)
    }

    pub fn camera(&self) -> Camera {
        Camera::new(
            DVec3::from_array(self.position),
            Orientation::from_degrees(self.yaw, self.pitch, self.roll),
            self.height,
            self.width,
            self.fov.to_radians(),
        )
    }
}

/// Sequential reader over whitespace-separated values.
struct Fields<'a>(SplitWhitespace<'a>);

impl Fields<'_> {
    fn next(&mut self, field: &'static str) -> Result<&str, ConfigError> {
        self.0.next().ok_or(ConfigError::MissingField(field))
    }

    fn number(&mut self, field: &'static str) -> Result<f64, ConfigError> {
        let raw = self.next(field)?;
        raw.parse().map_err(|_| ConfigError::InvalidValue {
            field,
            value: raw.to_owned(),
        })
    }

    fn count(&mut self, field: &'static str) -> Result<usize, ConfigError> {
        let raw = self.next(field)?;
        raw.parse().map_err(|_| ConfigError::InvalidValue {
            field,
            value: raw.to_owned(),
        })
    }

    fn flag(&mut self, field: &'static str) -> Result<bool, ConfigError> {
        let raw = self.next(field)?;
        raw.parse::<i64>()
            .map(|v| v != 0)
            .map_err(|_| ConfigError::InvalidValue {
                field,
                value: raw.to_owned(),
            })
    }
}

/// Errors raised while reading a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config ends before `{0}`")]
    MissingField(&'static str),
    #[error("invalid value {value:?} for `{field}`")]
    InvalidValue { field: &'static str, value: String },
    #[error("`{field}` {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}
