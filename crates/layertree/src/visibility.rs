//! Aggregate (tristate) visibility of groups.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{Layer, LayerNode};

/// Effective visibility of a node, in `[0, 1]`.
///
/// A leaf is `1.0` when visible and `0.0` otherwise. A group is the mean of
/// its direct children's effective visibilities; a group without children
/// counts as fully visible.
///
/// # Example
///
/// ```
/// use layertree::model::LayerNode;
/// use layertree::visibility::effective_visibility;
///
/// let group = LayerNode::group("g", vec![
///     LayerNode::leaf("x", false),
///     LayerNode::leaf("y", true),
/// ]);
/// assert_eq!(effective_visibility(&group), 0.5);
/// ```
pub fn effective_visibility(node: &LayerNode) -> f64 {
    match node {
        LayerNode::Leaf(leaf) => {
            if leaf.visibility {
                1.0
            } else {
                0.0
            }
        }
        LayerNode::Group(group) => group_visibility(&group.sublayers),
    }
}

/// Mean effective visibility of a list of sibling nodes; `1.0` when empty.
pub fn group_visibility(sublayers: &[Arc<LayerNode>]) -> f64 {
    if sublayers.is_empty() {
        return 1.0;
    }
    let sum: f64 = sublayers.iter().map(|n| effective_visibility(n)).sum();
    sum / sublayers.len() as f64
}

/// Aggregate visibility of a top-level layer's tree.
///
/// This looks at the sublayers only; the layer's own `visibility` flag is
/// a separate switch.
pub fn layer_visibility(layer: &Layer) -> f64 {
    group_visibility(&layer.sublayers)
}

/// Checkbox state of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tristate {
    Unchecked,
    Checked,
    Mixed,
}

impl Tristate {
    pub fn from_visibility(visibility: f64) -> Self {
        if visibility <= 0.0 {
            Tristate::Unchecked
        } else if visibility >= 1.0 {
            Tristate::Checked
        } else {
            Tristate::Mixed
        }
    }

    pub fn of(node: &LayerNode) -> Self {
        Self::from_visibility(effective_visibility(node))
    }
}
