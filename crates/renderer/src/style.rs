//! Colormap definitions loaded from style files.
//!
//! Style files are JSON or YAML:
//!
//! ```yaml
//! colormaps:
//!   coronal:
//!     description: Dark red to white
//!     stops:
//!       - { position: 0.0, color: "#200000" }
//!       - { position: 1.0, color: "#FFFFFF" }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use solar_common::{Color, ColorStop, Colormap};

use crate::RenderResult;

/// Named custom colormaps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StyleConfig {
    #[serde(default)]
    pub colormaps: HashMap<String, ColormapDefinition>,
}

/// A single colormap as written in a style file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColormapDefinition {
    #[serde(default)]
    pub description: Option<String>,
    pub stops: Vec<StopDefinition>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StopDefinition {
    pub position: f64,
    pub color: String,
}

impl ColormapDefinition {
    /// Validate the stops and build a colormap called `name`.
    pub fn to_colormap(&self, name: &str) -> RenderResult<Colormap> {
        let stops = self
            .stops
            .iter()
            .map(|s| -> RenderResult<ColorStop> {
                Ok(ColorStop::new(s.position, Color::from_hex(&s.color)?))
            })
            .collect::<RenderResult<Vec<_>>>()?;
        Ok(Colormap::new(name, stops)?)
    }
}

impl StyleConfig {
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> RenderResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a style file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file(path: &Path) -> RenderResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ColormapDefinition> {
        self.colormaps.get(name)
    }

    /// Custom colormap `name` if defined, otherwise the built-in of that name.
    pub fn resolve(&self, name: &str) -> RenderResult<Arc<Colormap>> {
        let colormap = match self.get(name) {
            Some(definition) => definition.to_colormap(name)?,
            None => Colormap::named(name)?,
        };
        Ok(Arc::new(colormap))
    }
}
