//! Layer tree configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::legend::LegendOptions;
use crate::model::Layer;

/// Query parameter that carries the visible layer list in the page URL.
pub const DEFAULT_URL_PARAM: &str = "l";

/// Options shared by the edit operations, the session and the renderer.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```
/// use layertree::config::LayerTreeConfig;
///
/// let config = LayerTreeConfig::from_json(r#"{"url_param": "layers"}"#).unwrap();
/// assert_eq!(config.url_param, "layers");
/// assert_eq!(config.hidden_groups, vec!["background"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerTreeConfig {
    pub legend: LegendOptions,
    /// URL parameter updated with `LAYERS` after visibility edits.
    pub url_param: String,
    /// Layers whose `group` tag is listed here are left out of the tree.
    pub hidden_groups: Vec<String>,
}

impl Default for LayerTreeConfig {
    fn default() -> Self {
        Self {
            legend: LegendOptions::default(),
            url_param: DEFAULT_URL_PARAM.to_string(),
            hidden_groups: vec!["background".to_string()],
        }
    }
}

impl LayerTreeConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, crate::cli::CliError> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::from_json(&raw)?)
    }

    /// Whether `layer` is kept out of the rendered tree.
    pub fn is_hidden(&self, layer: &Layer) -> bool {
        layer
            .group
            .as_deref()
            .is_some_and(|g| self.hidden_groups.iter().any(|h| h == g))
    }
}
