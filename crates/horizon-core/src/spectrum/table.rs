//! Color-matching weights used to integrate a spectrum into XYZ.
//!
//! The text format has one row per wavelength: `<nm> <x̄> <ȳ> <z̄>`, separated
//! by whitespace. Rows may come in any order; bins that never appear keep a
//! weight of zero.

use std::path::Path;

use super::{SPECTRUM_BINS, SpectrumError, WAVELENGTH_STEP};

/// Per-bin x̄, ȳ, z̄ weights. Loaded once and shared read-only by every
/// conversion of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingTable {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl MatchingTable {
    /// A table with every weight at zero.
    pub fn zeroed() -> Self {
        Self {
            x: vec![0.0; SPECTRUM_BINS],
            y: vec![0.0; SPECTRUM_BINS],
            z: vec![0.0; SPECTRUM_BINS],
        }
    }

    /// Parse the whitespace-separated table format.
    pub fn parse(text: &str) -> Result<Self, SpectrumError> {
        let mut table = Self::zeroed();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let row = raw.trim();
            if row.is_empty() || row.starts_with('#') {
                continue;
            }

            let malformed = || SpectrumError::MalformedRow {
                line,
                content: row.to_string(),
            };
            let fields: Vec<&str> = row.split_whitespace().collect();
            let [wavelength, x, y, z] = fields.as_slice() else {
                return Err(malformed());
            };
            let wavelength: u32 = wavelength.parse().map_err(|_| malformed())?;
            let weights: [f64; 3] = [
                x.parse().map_err(|_| malformed())?,
                y.parse().map_err(|_| malformed())?,
                z.parse().map_err(|_| malformed())?,
            ];

            if wavelength % WAVELENGTH_STEP != 0 {
                return Err(SpectrumError::MisalignedWavelength { line, wavelength });
            }
            let bin = (wavelength / WAVELENGTH_STEP) as usize;
            if bin >= SPECTRUM_BINS {
                return Err(SpectrumError::WavelengthOutOfGrid { line, wavelength });
            }
            table.x[bin] = weights[0];
            table.y[bin] = weights[1];
            table.z[bin] = weights[2];
        }
        Ok(table)
    }

    /// Read and parse a table file.
    pub fn load(path: &Path) -> Result<Self, SpectrumError> {
        let text = std::fs::read_to_string(path)?;
        let table = Self::parse(&text)?;
        tracing::debug!("loaded color-matching table from {}", path.display());
        Ok(table)
    }
}
