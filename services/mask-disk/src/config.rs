//! Configuration for the mask-disk tool.
//!
//! Loaded from an optional YAML file. Every field has a default, and
//! command-line flags override file values.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use disk_mask::{MaskOptions, DISK_THRESHOLD};
use renderer::limb::DEFAULT_LIMB_POINTS;
use renderer::{ColormapDefinition, LimbStyle, StyleConfig};
use serde::{Deserialize, Serialize};
use solar_common::{Color, DisplayConfig, Scaling, SolarMap};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Normalized radius at or below which pixels are masked.
    pub threshold: f64,

    /// Color of masked and invalid pixels.
    pub bad_color: Color,

    /// Built-in colormap name, or a key of `colormaps`.
    pub colormap: String,

    pub scaling: Scaling,

    pub vmin: Option<f64>,
    pub vmax: Option<f64>,

    pub draw_limb: bool,
    pub limb_color: Color,
    pub limb_points: usize,

    /// Custom colormaps by name.
    pub colormaps: HashMap<String, ColormapDefinition>,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            threshold: DISK_THRESHOLD,
            bad_color: Color::BLACK,
            colormap: "sdoaia171".to_string(),
            scaling: Scaling::Asinh,
            vmin: None,
            vmax: None,
            draw_limb: true,
            limb_color: Color::WHITE,
            limb_points: DEFAULT_LIMB_POINTS,
            colormaps: HashMap::new(),
        }
    }
}

/// Values given on the command line, applied over the file configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub threshold: Option<f64>,
    pub bad_color: Option<Color>,
    pub colormap: Option<String>,
    pub scaling: Option<Scaling>,
    pub no_limb: bool,
}

impl MaskConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Invalid mask configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Configuration from `path`, or the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(threshold) = overrides.threshold {
            self.threshold = threshold;
        }
        if let Some(color) = overrides.bad_color {
            self.bad_color = color;
        }
        if let Some(colormap) = &overrides.colormap {
            self.colormap = colormap.clone();
        }
        if let Some(scaling) = overrides.scaling {
            self.scaling = scaling;
        }
        if overrides.no_limb {
            self.draw_limb = false;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.threshold.is_finite() && self.threshold > 0.0,
            "threshold must be a positive number, got {}",
            self.threshold
        );
        if let (Some(vmin), Some(vmax)) = (self.vmin, self.vmax) {
            ensure!(vmin < vmax, "vmin ({}) must be below vmax ({})", vmin, vmax);
        }
        ensure!(
            !self.draw_limb || self.limb_points >= 3,
            "limb_points must be at least 3, got {}",
            self.limb_points
        );
        Ok(())
    }

    pub fn mask_options(&self) -> MaskOptions {
        MaskOptions {
            threshold: self.threshold,
        }
    }

    pub fn limb_style(&self) -> LimbStyle {
        LimbStyle {
            color: self.limb_color,
            points: self.limb_points,
        }
    }

    /// Display settings for `map`, derived from the map's own settings.
    ///
    /// The map's display configuration is not modified.
    pub fn display_for(&self, map: &SolarMap) -> Result<DisplayConfig> {
        let styles = StyleConfig {
            colormaps: self.colormaps.clone(),
        };
        let colormap = styles
            .resolve(&self.colormap)
            .with_context(|| format!("Cannot use colormap '{}'", self.colormap))?;

        Ok(map
            .display()
            .with_colormap(colormap)
            .with_scaling(self.scaling)
            .with_limits(self.vmin, self.vmax)
            .with_bad_color(self.bad_color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::synthetic_map;

    #[test]
    fn test_defaults() {
        let config = MaskConfig::default();
        assert_eq!(config.threshold, 1.0);
        assert_eq!(config.bad_color, Color::BLACK);
        assert_eq!(config.colormap, "sdoaia171");
        assert_eq!(config.scaling, Scaling::Asinh);
        assert!(config.draw_limb);
        assert_eq!(config.limb_points, 360);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = MaskConfig::from_yaml(
            r##"
threshold: 1.1
bad_color: "#102030"
scaling: linear
"##,
        )
        .unwrap();
        assert_eq!(config.threshold, 1.1);
        assert_eq!(config.bad_color, Color::rgb(0x10, 0x20, 0x30));
        assert_eq!(config.scaling, Scaling::Linear);
        assert_eq!(config.colormap, "sdoaia171");
        assert_eq!(config.limb_color, Color::WHITE);
    }

    #[test]
    fn test_invalid_color_rejected() {
        assert!(MaskConfig::from_yaml("bad_color: chartreuse-ish").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            threshold: Some(0.9),
            colormap: Some("gray".to_string()),
            no_limb: true,
            ..Overrides::default()
        };
        let config = MaskConfig::default().with_overrides(&overrides);
        assert_eq!(config.threshold, 0.9);
        assert_eq!(config.colormap, "gray");
        assert!(!config.draw_limb);
        assert_eq!(config.bad_color, Color::BLACK);
    }

    #[test]
    fn test_validate() {
        let bad_threshold = MaskConfig {
            threshold: -1.0,
            ..MaskConfig::default()
        };
        assert!(bad_threshold.validate().is_err());

        let bad_limits = MaskConfig {
            vmin: Some(10.0),
            vmax: Some(1.0),
            ..MaskConfig::default()
        };
        assert!(bad_limits.validate().is_err());
    }

    #[test]
    fn test_display_for_leaves_map_untouched() {
        let map = synthetic_map(4, 1.0, 1.5);
        let config = MaskConfig::from_yaml(
            r##"
colormap: coronal
colormaps:
  coronal:
    stops:
      - { position: 0.0, color: "#000000" }
      - { position: 1.0, color: "#FF8000" }
"##,
        )
        .unwrap();

        let display = config.display_for(&map).unwrap();
        assert_eq!(display.colormap().name, "coronal");
        assert_eq!(display.bad_color(), Color::BLACK);
        assert_eq!(map.display().bad_color(), Color::transparent());
        assert_eq!(map.display().colormap().name, "gray");
    }

    #[test]
    fn test_unknown_colormap() {
        let map = synthetic_map(4, 1.0, 1.5);
        let config = MaskConfig {
            colormap: "jet".to_string(),
            ..MaskConfig::default()
        };
        assert!(config.display_for(&map).is_err());
    }
}
