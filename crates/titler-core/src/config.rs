use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{TitlerError, TitlerResult};
use crate::time::Duration;

/// Largest outline weight, in pixels, a run accepts.
pub const MAX_STROKE_WEIGHT: u32 = 255;

/// How the subtitle parser treats malformed entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strictness {
    /// Any malformed entry rejects the whole file.
    Strict,
    /// Malformed optional fields are dropped; other errors are fatal.
    Lenient,
    /// Malformed entries are skipped and parsing continues.
    #[default]
    SkipInvalid,
}

impl FromStr for Strictness {
    type Err = TitlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Strictness::Strict),
            "lenient" => Ok(Strictness::Lenient),
            "skip-invalid" | "skip" => Ok(Strictness::SkipInvalid),
            other => Err(TitlerError::InvalidArgument(format!(
                "unknown strictness '{}' (expected strict, lenient or skip-invalid)",
                other
            ))),
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strictness::Strict => "strict",
            Strictness::Lenient => "lenient",
            Strictness::SkipInvalid => "skip-invalid",
        };
        f.write_str(name)
    }
}

/// Settings for one captioning run. Every field has a default, so a TOML
/// file only needs the keys it wants to set.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TitlerConfig {
    pub font: Option<PathBuf>,
    pub subtitles: Option<PathBuf>,
    pub gif: Option<PathBuf>,
    pub out: PathBuf,
    /// Point size; 0 means compute one from the longest caption line.
    pub font_size: f32,
    pub font_dpi: f32,
    pub font_stroke_weight: u32,
    /// Position in the subtitle timeline the first frame corresponds to
    /// (`1m30s`, `00:01:30,000`, ...).
    pub subtitles_offset: String,
    pub strictness: Strictness,
}

impl Default for TitlerConfig {
    fn default() -> Self {
        Self {
            font: None,
            subtitles: None,
            gif: None,
            out: PathBuf::from("output.gif"),
            font_size: 0.0,
            font_dpi: 72.0,
            font_stroke_weight: 3,
            subtitles_offset: "0".to_string(),
            strictness: Strictness::SkipInvalid,
        }
    }
}

impl TitlerConfig {
    pub fn load_from_file(path: &Path) -> TitlerResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| TitlerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save_to_file(&self, path: &Path) -> TitlerResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| TitlerError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Parsed `subtitles_offset`.
    pub fn offset(&self) -> TitlerResult<Duration> {
        self.subtitles_offset.parse()
    }

    /// Check that the run can start: input paths are present and numeric
    /// settings are in range.
    pub fn validate(&self) -> TitlerResult<()> {
        for (name, value) in [
            ("font", &self.font),
            ("subtitles", &self.subtitles),
            ("gif", &self.gif),
        ] {
            if value.is_none() {
                return Err(TitlerError::Config(format!("missing required path '{}'", name)));
            }
        }
        if !self.font_size.is_finite() || self.font_size < 0.0 {
            return Err(TitlerError::Config(format!(
                "font size must be >= 0, got {}",
                self.font_size
            )));
        }
        if !self.font_dpi.is_finite() || self.font_dpi <= 0.0 {
            return Err(TitlerError::Config(format!(
                "font dpi must be > 0, got {}",
                self.font_dpi
            )));
        }
        if self.font_stroke_weight > MAX_STROKE_WEIGHT {
            return Err(TitlerError::Config(format!(
                "font stroke weight must be <= {}, got {}",
                MAX_STROKE_WEIGHT, self.font_stroke_weight
            )));
        }
        self.offset()?;
        Ok(())
    }
}
