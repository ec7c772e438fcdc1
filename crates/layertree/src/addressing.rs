//! Path addressing with copy-on-write cloning.
//!
//! [`resolve`] is a read-only lookup. [`resolve_mut`] walks the same path
//! but unshares every node it passes through with [`Arc::make_mut`]: a node
//! still referenced by another tree is shallow-cloned (its `sublayers` vector
//! is copied, the child `Arc`s are not), a node owned only by this tree is
//! reused. Off-path subtrees are never touched, so they stay pointer-equal to
//! the tree the edit started from.
//!
//! [`resolve_and_clone`] combines the two into the edit protocol used by
//! [`crate::ops`]: clone the root, unshare the path, mutate the target.

use std::sync::Arc;

use layertree_path::validate_path;
use tracing::trace;

use crate::error::TreeError;
use crate::model::{Layer, LayerNode};

/// Read-only view of an addressed node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// The empty path: the top-level layer itself.
    Layer(&'a Layer),
    Node(&'a LayerNode),
}

impl<'a> NodeRef<'a> {
    pub fn sublayers(&self) -> &'a [Arc<LayerNode>] {
        match *self {
            NodeRef::Layer(layer) => &layer.sublayers,
            NodeRef::Node(node) => node.sublayers(),
        }
    }

    pub fn as_node(&self) -> Option<&'a LayerNode> {
        match *self {
            NodeRef::Layer(_) => None,
            NodeRef::Node(node) => Some(node),
        }
    }
}

/// Mutable view of an addressed node, unshared from any previous tree.
#[derive(Debug)]
pub enum NodeMut<'a> {
    Layer(&'a mut Layer),
    Node(&'a mut LayerNode),
}

/// Looks up the node at `path`.
///
/// # Errors
///
/// - [`TreeError::OutOfRange`] if a step indexes past the end of `sublayers`
/// - [`TreeError::NotAGroup`] if a step descends into a leaf
/// - [`TreeError::Path`] if `path` is deeper than
///   [`layertree_path::MAX_PATH_LENGTH`]
///
/// # Example
///
/// ```
/// use layertree::addressing::{resolve, NodeRef};
/// use layertree::model::{Layer, LayerNode};
///
/// let layer = Layer::new("l", vec![
///     LayerNode::group("g", vec![LayerNode::leaf("x", true)]),
/// ]);
/// let node = resolve(&layer, &[0, 0]).unwrap().as_node().unwrap();
/// assert_eq!(node.name(), "x");
/// assert!(matches!(resolve(&layer, &[]).unwrap(), NodeRef::Layer(_)));
/// assert!(resolve(&layer, &[1]).is_err());
/// ```
pub fn resolve<'a>(layer: &'a Layer, path: &[usize]) -> Result<NodeRef<'a>, TreeError> {
    validate_path(path)?;
    let Some((&first, rest)) = path.split_first() else {
        return Ok(NodeRef::Layer(layer));
    };

    let mut current = child(&layer.sublayers, first, 0)?;
    for (i, &idx) in rest.iter().enumerate() {
        current = match current {
            LayerNode::Group(group) => child(&group.sublayers, idx, i + 1)?,
            LayerNode::Leaf(_) => return Err(TreeError::NotAGroup { depth: i + 1 }),
        };
    }
    Ok(NodeRef::Node(current))
}

/// Walks `path`, unsharing each node on the way, and returns the target.
///
/// On error, nodes before the failing step may already have been unshared.
/// Their values are unchanged.
///
/// # Errors
///
/// Same as [`resolve`].
pub fn resolve_mut<'a>(layer: &'a mut Layer, path: &[usize]) -> Result<NodeMut<'a>, TreeError> {
    validate_path(path)?;
    let Some((&first, rest)) = path.split_first() else {
        return Ok(NodeMut::Layer(layer));
    };

    let mut current = child_mut(&mut layer.sublayers, first, 0)?;
    for (i, &idx) in rest.iter().enumerate() {
        current = match current {
            LayerNode::Group(group) => child_mut(&mut group.sublayers, idx, i + 1)?,
            LayerNode::Leaf(_) => return Err(TreeError::NotAGroup { depth: i + 1 }),
        };
    }
    Ok(NodeMut::Node(current))
}

/// Copies `layer` along `path` and applies `edit` to the fresh target.
///
/// Returns the new root together with whatever `edit` returned. `layer`
/// itself is never modified; if the path or the edit fails, the partially
/// built copy is dropped.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use layertree::addressing::{resolve_and_clone, NodeMut};
/// use layertree::model::{Layer, LayerNode};
///
/// let layer = Layer::new("l", vec![
///     LayerNode::group("g", vec![LayerNode::leaf("x", false)]),
///     LayerNode::leaf("y", true),
/// ]);
/// let (copy, ()) = resolve_and_clone(&layer, &[0, 0], |target| {
///     if let NodeMut::Node(LayerNode::Leaf(leaf)) = target {
///         leaf.visibility = true;
///     }
///     Ok(())
/// }).unwrap();
/// assert!(!Arc::ptr_eq(&copy.sublayers[0], &layer.sublayers[0]));
/// assert!(Arc::ptr_eq(&copy.sublayers[1], &layer.sublayers[1]));
/// ```
pub fn resolve_and_clone<R, F>(layer: &Layer, path: &[usize], edit: F) -> Result<(Layer, R), TreeError>
where
    F: FnOnce(NodeMut<'_>) -> Result<R, TreeError>,
{
    let mut copy = layer.clone();
    let target = resolve_mut(&mut copy, path)?;
    let out = edit(target)?;
    trace!(layer = %layer.id, depth = path.len(), "cloned path");
    Ok((copy, out))
}

fn child(sublayers: &[Arc<LayerNode>], index: usize, depth: usize) -> Result<&LayerNode, TreeError> {
    sublayers
        .get(index)
        .map(Arc::as_ref)
        .ok_or(TreeError::OutOfRange {
            depth,
            index,
            len: sublayers.len(),
        })
}

fn child_mut(
    sublayers: &mut [Arc<LayerNode>],
    index: usize,
    depth: usize,
) -> Result<&mut LayerNode, TreeError> {
    let len = sublayers.len();
    let slot = sublayers
        .get_mut(index)
        .ok_or(TreeError::OutOfRange { depth, index, len })?;
    Ok(Arc::make_mut(slot))
}
