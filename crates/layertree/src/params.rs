//! Service request parameters derived from a layer tree.
//!
//! [`build_params`] walks the top-level sublayers depth-first and lists the
//! visible leaves in tree order. The order decides the drawing order in the
//! image request, so it is never sorted or deduplicated.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::LayerNode;

/// Parameters describing an image-service request for one top-level layer.
///
/// Each list serializes as a comma-joined string under its upper-case
/// query-parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerParams {
    /// Names of visible leaves.
    #[serde(rename = "LAYERS", default, with = "comma_list")]
    pub layers: Vec<String>,
    /// Stored opacity of each entry in `layers`.
    #[serde(rename = "OPACITIES", default, with = "comma_list")]
    pub opacities: Vec<u8>,
    /// Names of visible queryable leaves.
    #[serde(rename = "QUERY_LAYERS", default, with = "comma_list")]
    pub query_layers: Vec<String>,
}

impl LayerParams {
    /// The serialized `LAYERS` value, as pushed to the URL state.
    pub fn layers_string(&self) -> String {
        self.layers.join(",")
    }

    pub fn opacities_string(&self) -> String {
        join(&self.opacities)
    }

    pub fn query_layers_string(&self) -> String {
        self.query_layers.join(",")
    }

    /// Query-string pairs in request order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("LAYERS", self.layers_string()),
            ("OPACITIES", self.opacities_string()),
            ("QUERY_LAYERS", self.query_layers_string()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Derives request parameters from the ordered top-level sublayers.
///
/// # Example
///
/// ```
/// use layertree::model::{Layer, LayerNode};
/// use layertree::params::build_params;
///
/// let layer = Layer::new("l", vec![
///     LayerNode::leaf("A", true),
///     LayerNode::leaf("B", false),
///     LayerNode::leaf("C", true),
/// ]);
/// assert_eq!(build_params(&layer.sublayers).layers, vec!["A", "C"]);
/// ```
pub fn build_params(sublayers: &[Arc<LayerNode>]) -> LayerParams {
    let mut params = LayerParams::default();
    collect(sublayers, &mut params);
    params
}

fn collect(sublayers: &[Arc<LayerNode>], params: &mut LayerParams) {
    for node in sublayers {
        match node.as_ref() {
            LayerNode::Group(group) => collect(&group.sublayers, params),
            LayerNode::Leaf(leaf) if leaf.visibility => {
                params.layers.push(leaf.name.clone());
                params.opacities.push(leaf.opacity);
                if leaf.queryable {
                    params.query_layers.push(leaf.name.clone());
                }
            }
            LayerNode::Leaf(_) => {}
        }
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

mod comma_list {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer, Serializer};

    #[allow(clippy::ptr_arg)]
    pub(super) fn serialize<S, T>(items: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        serializer.serialize_str(&super::join(items))
    }

    pub(super) fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        raw.split(',')
            .map(|item| item.parse().map_err(de::Error::custom))
            .collect()
    }
}
