//! Viewer configuration persistence.
//!
//! Tunables of the rendering pipeline and the defaults for new plots,
//! stored as JSON in the platform config directory. Plot data itself is
//! never persisted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::{Colormap, Rgba};
use crate::cull::{CullOptions, LocalRangePolicy};
use crate::error::{Result, ViewerError};
use crate::plot::PlotStyle;
use crate::render::RenderOptions;
use crate::state::{
    CULL_MARGIN, DEFAULT_LINE_WIDTH, DEFAULT_MAX_DISPLAY_POINTS, DEFAULT_POINT_SIZE, LINE_ALPHA,
    MAX_GRID_POWER, SCATTER_ALPHA, TICK_INTERVAL_MS,
};

const CONFIG_VERSION: u32 = 1;

/// Viewer settings that persist across sessions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Settings file version for migration support
    pub version: u32,
    /// Per-plot point cap before stride downsampling
    pub max_display_points: usize,
    /// Fraction of the view added on every side before culling
    pub cull_margin: f64,
    pub default_colormap: Colormap,
    pub default_point_size: f32,
    pub default_line_width: f32,
    /// Request equal aspect when no secondary axis is active
    pub prefer_equal_aspect: bool,
    pub local_range: LocalRangePolicy,
    pub scatter_alpha: f32,
    pub line_alpha: f32,
    /// Axis rescale timer period
    pub tick_interval_ms: u64,
    /// Horizontal grid spacing as a power of two; 0 disables it.
    /// Clamped to [`MAX_GRID_POWER`] on load.
    pub grid_power: u32,
    pub grid_color: Rgba,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            max_display_points: DEFAULT_MAX_DISPLAY_POINTS,
            cull_margin: CULL_MARGIN,
            default_colormap: Colormap::default(),
            default_point_size: DEFAULT_POINT_SIZE,
            default_line_width: DEFAULT_LINE_WIDTH,
            prefer_equal_aspect: true,
            local_range: LocalRangePolicy::default(),
            scatter_alpha: SCATTER_ALPHA,
            line_alpha: LINE_ALPHA,
            tick_interval_ms: TICK_INTERVAL_MS,
            grid_power: 0,
            grid_color: Rgba::GRAY,
        }
    }
}

impl ViewerConfig {
    /// Get the config directory path for the viewer
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("CloudView"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|p| p.join("CloudView"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs::config_dir().map(|p| p.join("cloudview"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        match Self::get_settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from a specific file. Missing or corrupt files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Self>(&content) {
                Ok(config) => config.sanitized(),
                Err(e) => {
                    tracing::warn!("Ignoring corrupt settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Pull out-of-range values back into their usable range
    fn sanitized(mut self) -> Self {
        if self.grid_power > MAX_GRID_POWER {
            tracing::warn!(
                "Clamping grid_power {} to {}",
                self.grid_power,
                MAX_GRID_POWER
            );
            self.grid_power = MAX_GRID_POWER;
        }
        self
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::get_settings_path().ok_or(ViewerError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_display_points: self.max_display_points,
            scatter_alpha: self.scatter_alpha,
            line_alpha: self.line_alpha,
            grid_power: self.grid_power,
            grid_color: self.grid_color,
        }
    }

    pub fn cull_options(&self) -> CullOptions {
        CullOptions {
            margin: self.cull_margin,
            local_range: self.local_range,
        }
    }

    /// Style given to plots that do not specify one
    pub fn default_style(&self) -> PlotStyle {
        PlotStyle {
            size: self.default_point_size,
            colormap: self.default_colormap,
            line_width: self.default_line_width,
            ..PlotStyle::default()
        }
    }
}
