//! Rendering configuration.
//!
//! Style settings are an explicit value passed to the renderer, never process
//! wide state. A JSON file may override any subset of the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::series::Palette;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub font_family: String,
    /// Base text size in points.
    pub font_size_pt: f64,
    /// Marker radius in points.
    pub marker_size_pt: f64,
    pub line_width_px: u32,
    /// Pixels per inch used to turn figure sizes into canvas sizes.
    pub dpi: f64,
    /// Columns of a standalone legend; `None` puts every entry on one row.
    pub legend_columns: Option<usize>,
    pub palette: Palette,
    pub naming: OutputNaming,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size_pt: 7.0,
            marker_size_pt: 3.0,
            line_width_px: 2,
            dpi: 200.0,
            legend_columns: None,
            palette: Palette::default(),
            naming: OutputNaming::default(),
        }
    }
}

impl RenderConfig {
    /// Load overrides from a JSON file; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RenderConfig =
            serde_json::from_str(json).map_err(|e| ChartError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.palette.validate()?;
        if !(self.dpi > 0.0) || !(self.font_size_pt > 0.0) {
            return Err(ChartError::InvalidConfig(
                "dpi and font_size_pt must be positive".into(),
            ));
        }
        if self.legend_columns == Some(0) {
            return Err(ChartError::InvalidConfig("legend_columns must be at least 1".into()));
        }
        if !self.naming.template.contains("{suffix}") {
            return Err(ChartError::InvalidConfig(format!(
                "naming template '{}' lacks {{suffix}}",
                self.naming.template
            )));
        }
        Ok(())
    }

    /// Points to canvas pixels.
    pub fn px(&self, points: f64) -> u32 {
        (points * self.dpi / 72.0).round().max(1.0) as u32
    }

    /// Figure size in inches to canvas pixels.
    pub fn canvas(&self, size_in: (f64, f64)) -> (u32, u32) {
        (
            (size_in.0 * self.dpi).round().max(1.0) as u32,
            (size_in.1 * self.dpi).round().max(1.0) as u32,
        )
    }
}

/// File naming for artifacts: `{index}` is the figure number, `{suffix}` the
/// panel letter (or `_legend`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputNaming {
    pub template: String,
}

impl Default for OutputNaming {
    fn default() -> Self {
        Self {
            template: "figure{index}{suffix}.svg".to_string(),
        }
    }
}

impl OutputNaming {
    pub const LEGEND_SUFFIX: &'static str = "_legend";

    pub fn file_name(&self, index: &str, suffix: &str) -> String {
        self.template.replace("{index}", index).replace("{suffix}", suffix)
    }

    pub fn panel_path(&self, dir: &Path, index: &str, suffix: char) -> PathBuf {
        dir.join(self.file_name(index, &suffix.to_string()))
    }

    pub fn legend_path(&self, dir: &Path, index: &str) -> PathBuf {
        dir.join(self.file_name(index, Self::LEGEND_SUFFIX))
    }

    /// Single-artifact figures have no panel letter.
    pub fn figure_path(&self, dir: &Path, index: &str) -> PathBuf {
        dir.join(self.file_name(index, ""))
    }
}
