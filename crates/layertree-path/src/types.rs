//! Type definitions for layer tree paths.

use std::fmt;

/// A step in a layer tree path: an index into the `sublayers` of the
/// current node.
pub type PathStep = usize;

/// A layer tree path.
///
/// The empty path addresses the top-level layer itself.
pub type Path = Vec<PathStep>;

/// Identifies one node of one top-level layer.
///
/// Formats as `<layer-id>/<i>/<j>/...`, the key used to track which edit
/// menu is open.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuKey {
    /// Id of the top-level layer.
    pub layer_id: String,
    /// Path of the node inside that layer.
    pub path: Path,
}

impl MenuKey {
    pub fn new(layer_id: impl Into<String>, path: &[PathStep]) -> Self {
        Self {
            layer_id: layer_id.into(),
            path: path.to_vec(),
        }
    }
}

impl fmt::Display for MenuKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format_menu_key(&self.layer_id, &self.path))
    }
}
