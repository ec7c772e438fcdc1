//! View model of the layer tree.
//!
//! [`render_tree`] is a pure function of the layers and the UI state. It
//! decides what a front end shows (checkbox states, which groups are open,
//! legend images, the open edit menu, slider positions) without producing
//! any markup. The `Display` impl draws the same model as indented text.

use std::fmt;

use layertree_path::{format_menu_key, MenuKey};
use serde::Serialize;

use crate::config::LayerTreeConfig;
use crate::legend::legend_url;
use crate::model::{Layer, LayerNode, Leaf};
use crate::ops::{slider_value, stored_opacity};
use crate::visibility::{group_visibility, Tristate};

/// UI state the tree is rendered with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState<'a> {
    pub expanded: bool,
    /// Node whose edit menu is open.
    pub active_menu: Option<&'a MenuKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeView {
    pub expanded: bool,
    pub layers: Vec<LayerView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerView {
    pub id: String,
    /// The layer's own on/off flag.
    pub visible: bool,
    pub root: GroupItem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TreeItem {
    Group(GroupItem),
    Leaf(LeafItem),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupItem {
    pub path: Vec<usize>,
    pub title: String,
    pub visibility: f64,
    pub state: Tristate,
    /// Empty when the group is fully hidden.
    pub children: Vec<TreeItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafItem {
    pub path: Vec<usize>,
    pub name: String,
    pub title: String,
    pub checked: bool,
    pub queryable: bool,
    /// Empty when the layer has no legend.
    pub legend_url: String,
    pub menu_key: String,
    pub menu_open: bool,
    /// Transparency slider position, `255 - opacity`.
    pub slider_value: u8,
}

/// Renders every layer not excluded by `config.hidden_groups`.
pub fn render_tree(layers: &[Layer], ui: &UiState<'_>, config: &LayerTreeConfig) -> TreeView {
    TreeView {
        expanded: ui.expanded,
        layers: layers
            .iter()
            .filter(|layer| !config.is_hidden(layer))
            .map(|layer| render_layer(layer, ui, config))
            .collect(),
    }
}

pub fn render_layer(layer: &Layer, ui: &UiState<'_>, config: &LayerTreeConfig) -> LayerView {
    let mut path = Vec::new();
    let renderer = Renderer { layer, ui, config };
    LayerView {
        id: layer.id.clone(),
        visible: layer.visibility,
        root: renderer.group(&layer.title, &layer.sublayers, &mut path),
    }
}

struct Renderer<'a> {
    layer: &'a Layer,
    ui: &'a UiState<'a>,
    config: &'a LayerTreeConfig,
}

impl Renderer<'_> {
    fn group(
        &self,
        title: &str,
        sublayers: &[std::sync::Arc<LayerNode>],
        path: &mut Vec<usize>,
    ) -> GroupItem {
        let visibility = group_visibility(sublayers);
        let mut children = Vec::new();
        if visibility > 0.0 {
            for (idx, node) in sublayers.iter().enumerate() {
                path.push(idx);
                children.push(match node.as_ref() {
                    LayerNode::Group(g) => {
                        TreeItem::Group(self.group(&g.title, &g.sublayers, path))
                    }
                    LayerNode::Leaf(leaf) => TreeItem::Leaf(self.leaf(node, leaf, path)),
                });
                path.pop();
            }
        }
        GroupItem {
            path: path.clone(),
            title: title.to_string(),
            visibility,
            state: Tristate::from_visibility(visibility),
            children,
        }
    }

    fn leaf(&self, node: &LayerNode, leaf: &Leaf, path: &[usize]) -> LeafItem {
        let menu_open = self
            .ui
            .active_menu
            .is_some_and(|key| key.layer_id == self.layer.id && key.path.as_slice() == path);
        LeafItem {
            path: path.to_vec(),
            name: leaf.name.clone(),
            title: leaf.title.clone(),
            checked: leaf.visibility,
            queryable: leaf.queryable,
            legend_url: legend_url(self.layer, node, &self.config.legend),
            menu_key: format_menu_key(&self.layer.id, path),
            menu_open,
            slider_value: slider_value(leaf.opacity),
        }
    }
}

impl fmt::Display for TreeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.expanded {
            return writeln!(f, "(collapsed)");
        }
        for layer in &self.layers {
            write_group(f, &layer.root, 0, !layer.visible)?;
        }
        Ok(())
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, group: &GroupItem, depth: usize, off: bool) -> fmt::Result {
    let mark = match group.state {
        Tristate::Unchecked => "[ ]",
        Tristate::Checked => "[x]",
        Tristate::Mixed => "[-]",
    };
    write!(f, "{:indent$}{} {}", "", mark, group.title, indent = depth * 2)?;
    if off {
        write!(f, " (off)")?;
    }
    writeln!(f)?;
    for child in &group.children {
        match child {
            TreeItem::Group(g) => write_group(f, g, depth + 1, false)?,
            TreeItem::Leaf(leaf) => {
                let mark = if leaf.checked { "[x]" } else { "[ ]" };
                write!(f, "{:indent$}{} {}", "", mark, leaf.title, indent = (depth + 1) * 2)?;
                if leaf.queryable {
                    write!(f, " (i)")?;
                }
                if leaf.menu_open {
                    write!(f, " <opacity {}>", stored_opacity(leaf.slider_value))?;
                }
                writeln!(f)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layers() -> Vec<Layer> {
        vec![
            Layer::new("bg", vec![LayerNode::leaf("osm", true)]).in_group("background"),
            Layer::new(
                "L",
                vec![
                    LayerNode::group(
                        "G",
                        vec![
                            LayerNode::leaf("X", false),
                            Leaf::new("Y").visible(true).queryable(true).opacity(55).into(),
                        ],
                    ),
                    LayerNode::group("H", vec![LayerNode::leaf("Z", false)]),
                ],
            )
            .title("Overlay")
            .wms("http://h/wms"),
        ]
    }

    #[test]
    fn test_background_layers_skipped() {
        let view = render_tree(&layers(), &UiState::default(), &LayerTreeConfig::default());
        assert_eq!(view.layers.len(), 1);
        assert_eq!(view.layers[0].id, "L");
    }

    #[test]
    fn test_group_states_and_hidden_children() {
        let view = render_tree(&layers(), &UiState::default(), &LayerTreeConfig::default());
        let root = &view.layers[0].root;
        assert_eq!(root.title, "Overlay");
        assert_eq!(root.visibility, 0.25);
        assert_eq!(root.state, Tristate::Mixed);
        let TreeItem::Group(g) = &root.children[0] else {
            panic!("expected group");
        };
        assert_eq!(g.state, Tristate::Mixed);
        assert_eq!(g.children.len(), 2);
        let TreeItem::Group(h) = &root.children[1] else {
            panic!("expected group");
        };
        assert_eq!(h.state, Tristate::Unchecked);
        assert!(h.children.is_empty());
        assert_eq!(h.path, vec![1]);
    }

    #[test]
    fn test_leaf_item() {
        let open = MenuKey::new("L", &[0, 1]);
        let ui = UiState {
            expanded: true,
            active_menu: Some(&open),
        };
        let view = render_tree(&layers(), &ui, &LayerTreeConfig::default());
        let TreeItem::Group(g) = &view.layers[0].root.children[0] else {
            panic!("expected group");
        };
        let TreeItem::Leaf(y) = &g.children[1] else {
            panic!("expected leaf");
        };
        assert_eq!(y.path, vec![0, 1]);
        assert!(y.checked);
        assert!(y.queryable);
        assert_eq!(y.menu_key, "L/0/1");
        assert!(y.menu_open);
        assert_eq!(y.slider_value, 200);
        assert_eq!(
            y.legend_url,
            "http://h/wms?SERVICE=WMS&REQUEST=GetLegendGraphic&VERSION=1.3.0&FORMAT=image/png&LAYER=Y"
        );
        let TreeItem::Leaf(x) = &g.children[0] else {
            panic!("expected leaf");
        };
        assert!(!x.menu_open);
    }

    #[test]
    fn test_text_rendering() {
        let mut all = layers();
        all[1].visibility = false;
        let open = MenuKey::new("L", &[0, 1]);
        let ui = UiState {
            expanded: true,
            active_menu: Some(&open),
        };
        let text = render_tree(&all, &ui, &LayerTreeConfig::default()).to_string();
        assert_eq!(
            text,
            "[-] Overlay (off)\n  [-] G\n    [ ] X\n    [x] Y (i) <opacity 55>\n  [ ] H\n"
        );
    }

    #[test]
    fn test_collapsed_text() {
        let text = render_tree(&layers(), &UiState::default(), &LayerTreeConfig::default())
            .to_string();
        assert_eq!(text, "(collapsed)\n");
    }
}
