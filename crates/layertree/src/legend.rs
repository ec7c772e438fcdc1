//! Legend graphic URLs.

use serde::{Deserialize, Serialize};

use crate::model::{Layer, LayerNode};

/// Fixed parameters of a `GetLegendGraphic` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendOptions {
    pub service: String,
    pub version: String,
    pub format: String,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            service: "WMS".to_string(),
            version: "1.3.0".to_string(),
            format: "image/png".to_string(),
        }
    }
}

/// Builds the legend image URL of `sublayer`.
///
/// Only WMS layers have legends; any other layer yields an empty string.
/// The sublayer name is appended as-is.
///
/// # Example
///
/// ```
/// use layertree::legend::{legend_url, LegendOptions};
/// use layertree::model::{Layer, LayerNode};
///
/// let leaf = LayerNode::leaf("roads", true);
/// let layer = Layer::new("l", vec![leaf.clone()]).wms("https://maps.example.com/ows");
/// assert_eq!(
///     legend_url(&layer, &leaf, &LegendOptions::default()),
///     "https://maps.example.com/ows?SERVICE=WMS&REQUEST=GetLegendGraphic&VERSION=1.3.0&FORMAT=image/png&LAYER=roads"
/// );
/// ```
pub fn legend_url(layer: &Layer, sublayer: &LayerNode, options: &LegendOptions) -> String {
    if !layer.kind.is_wms() {
        return String::new();
    }
    format!(
        "{}?SERVICE={}&REQUEST=GetLegendGraphic&VERSION={}&FORMAT={}&LAYER={}",
        layer.url,
        options.service,
        options.version,
        options.format,
        sublayer.name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServiceKind;

    #[test]
    fn test_non_wms_has_no_legend() {
        let leaf = LayerNode::leaf("roads", true);
        let mut layer = Layer::new("l", vec![leaf.clone()]);
        layer.url = "https://tiles.example.com".into();
        layer.kind = ServiceKind::Other("wmts".into());
        assert_eq!(legend_url(&layer, &leaf, &LegendOptions::default()), "");
        layer.kind = ServiceKind::Unknown;
        assert_eq!(legend_url(&layer, &leaf, &LegendOptions::default()), "");
    }

    #[test]
    fn test_custom_options() {
        let leaf = LayerNode::leaf("a", true);
        let layer = Layer::new("l", vec![]).wms("http://h/wms");
        let options = LegendOptions {
            format: "image/jpeg".into(),
            ..LegendOptions::default()
        };
        assert_eq!(
            legend_url(&layer, &leaf, &options),
            "http://h/wms?SERVICE=WMS&REQUEST=GetLegendGraphic&VERSION=1.3.0&FORMAT=image/jpeg&LAYER=a"
        );
    }

    #[test]
    fn test_options_partial_json() {
        let options: LegendOptions = serde_json::from_str(r#"{"version": "1.1.1"}"#).unwrap();
        assert_eq!(options.version, "1.1.1");
        assert_eq!(options.service, "WMS");
    }
}
