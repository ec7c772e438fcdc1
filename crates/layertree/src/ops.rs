//! Layer edits.
//!
//! Each operation takes the current top-level layer and returns an [`Edit`]:
//! a replacement layer built by copying only the edited path (see
//! [`crate::addressing`]), with `params` recomputed when the leaves changed,
//! plus the URL update to push when the visible layer list changed. The
//! input layer is never modified.

use std::sync::Arc;

use layertree_path::is_root;
use tracing::debug;

use crate::addressing::{resolve_and_clone, NodeMut};
use crate::config::LayerTreeConfig;
use crate::error::TreeError;
use crate::model::{Layer, LayerNode, MAX_OPACITY};
use crate::url::UrlPatch;
use crate::visibility::group_visibility;

/// Result of an edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    /// The replacement top-level layer.
    pub layer: Layer,
    /// URL state update, when the visible layer list changed.
    pub url_patch: Option<UrlPatch>,
}

impl Edit {
    fn unchanged(layer: &Layer) -> Self {
        Self {
            layer: layer.clone(),
            url_patch: None,
        }
    }
}

/// Converts a transparency slider value to stored opacity.
///
/// The slider runs the other way round from the stored value: the stored
/// opacity is `255 - slider`.
pub fn stored_opacity(slider: u8) -> u8 {
    MAX_OPACITY - slider
}

/// Converts stored opacity back to the slider value.
pub fn slider_value(opacity: u8) -> u8 {
    MAX_OPACITY - opacity
}

/// Flips the visibility of the leaf at `path`.
///
/// # Errors
///
/// - [`TreeError::EmptyPath`] for the root path
/// - [`TreeError::NotALeaf`] if `path` addresses a group
/// - any addressing error of [`crate::addressing::resolve`]
///
/// # Example
///
/// ```
/// use layertree::model::{Layer, LayerNode};
/// use layertree::ops::toggle_leaf;
///
/// let layer = Layer::new("l", vec![
///     LayerNode::group("g", vec![LayerNode::leaf("x", false), LayerNode::leaf("y", true)]),
/// ]);
/// let edit = toggle_leaf(&layer, &[0, 0]).unwrap();
/// assert_eq!(edit.layer.params.layers, vec!["x", "y"]);
/// assert_eq!(edit.url_patch.unwrap().get("l"), Some("x,y"));
/// ```
pub fn toggle_leaf(layer: &Layer, path: &[usize]) -> Result<Edit, TreeError> {
    toggle_leaf_with(layer, path, &LayerTreeConfig::default())
}

pub fn toggle_leaf_with(
    layer: &Layer,
    path: &[usize],
    config: &LayerTreeConfig,
) -> Result<Edit, TreeError> {
    if is_root(path) {
        return Err(TreeError::EmptyPath);
    }
    let (mut next, visible) = resolve_and_clone(layer, path, |target| match target {
        NodeMut::Node(LayerNode::Leaf(leaf)) => {
            leaf.visibility = !leaf.visibility;
            Ok(leaf.visibility)
        }
        _ => Err(TreeError::NotALeaf),
    })?;
    next.refresh_params();
    debug!(layer = %layer.id, ?path, visible, "leaf toggled");
    let url_patch = Some(layers_patch(&next, config));
    Ok(Edit {
        layer: next,
        url_patch,
    })
}

/// Toggles a group.
///
/// With the root path this flips the layer's own `visibility` flag and
/// nothing else: sublayers, params and the URL are left alone.
///
/// With a path to an interior group, every leaf below it is set to the same
/// state: shown if the group was hidden or mixed, hidden if it was fully
/// visible. Subtrees already in that state keep their identity; when no leaf
/// changes the layer is returned as is.
///
/// # Errors
///
/// - [`TreeError::ExpectedGroup`] if `path` addresses a leaf
/// - any addressing error of [`crate::addressing::resolve`]
pub fn toggle_group(layer: &Layer, path: &[usize]) -> Result<Edit, TreeError> {
    toggle_group_with(layer, path, &LayerTreeConfig::default())
}

pub fn toggle_group_with(
    layer: &Layer,
    path: &[usize],
    config: &LayerTreeConfig,
) -> Result<Edit, TreeError> {
    if is_root(path) {
        let mut next = layer.clone();
        next.visibility = !layer.visibility;
        debug!(layer = %layer.id, visible = next.visibility, "layer toggled");
        return Ok(Edit {
            layer: next,
            url_patch: None,
        });
    }

    let (mut next, (visible, changed)) = resolve_and_clone(layer, path, |target| match target {
        NodeMut::Node(LayerNode::Group(group)) => {
            let visible = group_visibility(&group.sublayers) < 1.0;
            Ok((visible, set_leaves(&mut group.sublayers, visible)))
        }
        _ => Err(TreeError::ExpectedGroup),
    })?;
    if !changed {
        return Ok(Edit::unchanged(layer));
    }
    next.refresh_params();
    debug!(layer = %layer.id, ?path, visible, "group toggled");
    let url_patch = Some(layers_patch(&next, config));
    Ok(Edit {
        layer: next,
        url_patch,
    })
}

/// Sets the opacity of the leaf at `path` from a transparency slider value.
///
/// # Errors
///
/// Same as [`toggle_leaf`].
///
/// # Example
///
/// ```
/// use layertree::addressing::resolve;
/// use layertree::model::{Layer, LayerNode};
/// use layertree::ops::{change_opacity, slider_value};
///
/// let layer = Layer::new("l", vec![LayerNode::leaf("x", true)]);
/// let edit = change_opacity(&layer, &[0], 100).unwrap();
/// let leaf = resolve(&edit.layer, &[0]).unwrap().as_node().unwrap().as_leaf().unwrap().clone();
/// assert_eq!(leaf.opacity, 155);
/// assert_eq!(slider_value(leaf.opacity), 100);
/// assert!(edit.url_patch.is_none());
/// ```
pub fn change_opacity(layer: &Layer, path: &[usize], value: u8) -> Result<Edit, TreeError> {
    if is_root(path) {
        return Err(TreeError::EmptyPath);
    }
    let (mut next, ()) = resolve_and_clone(layer, path, |target| match target {
        NodeMut::Node(LayerNode::Leaf(leaf)) => {
            leaf.opacity = stored_opacity(value);
            Ok(())
        }
        _ => Err(TreeError::NotALeaf),
    })?;
    next.refresh_params();
    debug!(layer = %layer.id, ?path, value, "opacity changed");
    Ok(Edit {
        layer: next,
        url_patch: None,
    })
}

fn layers_patch(layer: &Layer, config: &LayerTreeConfig) -> UrlPatch {
    UrlPatch::single(config.url_param.as_str(), layer.params.layers_string())
}

/// Sets every leaf below `sublayers` to `visible`, unsharing only the
/// subtrees that contain a leaf in the other state. Returns whether any
/// leaf changed.
fn set_leaves(sublayers: &mut [Arc<LayerNode>], visible: bool) -> bool {
    let mut changed = false;
    for slot in sublayers.iter_mut() {
        if !has_leaf_not(slot, visible) {
            continue;
        }
        match Arc::make_mut(slot) {
            LayerNode::Leaf(leaf) => leaf.visibility = visible,
            LayerNode::Group(group) => {
                set_leaves(&mut group.sublayers, visible);
            }
        }
        changed = true;
    }
    changed
}

fn has_leaf_not(node: &LayerNode, visible: bool) -> bool {
    match node {
        LayerNode::Leaf(leaf) => leaf.visibility != visible,
        LayerNode::Group(group) => group.sublayers.iter().any(|n| has_leaf_not(n, visible)),
    }
}
