//! Layer tree data model.
//!
//! A top-level [`Layer`] is the root group of its tree. Below it, every
//! [`LayerNode`] is either a [`Group`] (visibility derived from its
//! sublayers) or a [`Leaf`] (visibility, opacity and queryability stored
//! directly).
//!
//! Children are held behind [`Arc`] so that an edit can rebuild only the
//! nodes on the edited path while every other subtree is shared with the
//! previous tree. Never mutate a node reachable from a tree someone else
//! holds; go through [`crate::addressing`] instead.
//!
//! # Wire shape
//!
//! Nodes (de)serialize in the flat JSON shape used by map state stores: an
//! object is a group iff it carries a `sublayers` key, even an empty one.

use std::fmt;
use std::sync::Arc;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::params::{build_params, LayerParams};

pub const MAX_OPACITY: u8 = 255;

/// Kind of service a top-level layer is drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceKind {
    Wms,
    Other(String),
    #[default]
    Unknown,
}

impl ServiceKind {
    pub fn as_str(&self) -> &str {
        match self {
            ServiceKind::Wms => "wms",
            ServiceKind::Other(s) => s,
            ServiceKind::Unknown => "",
        }
    }

    pub fn is_wms(&self) -> bool {
        matches!(self, ServiceKind::Wms)
    }
}

impl From<String> for ServiceKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "wms" => ServiceKind::Wms,
            "" => ServiceKind::Unknown,
            _ => ServiceKind::Other(s),
        }
    }
}

impl From<ServiceKind> for String {
    fn from(kind: ServiceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leaf sublayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    /// Service-side layer name, used in `LAYERS` and legend requests.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub visibility: bool,
    /// Stored opacity, 255 = fully opaque.
    #[serde(default = "default_opacity")]
    pub opacity: u8,
    #[serde(default)]
    pub queryable: bool,
}

impl Leaf {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            visibility: false,
            opacity: MAX_OPACITY,
            queryable: false,
        }
    }

    pub fn visible(mut self, visibility: bool) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn queryable(mut self, queryable: bool) -> Self {
        self.queryable = queryable;
        self
    }

    pub fn opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// A nested group of sublayers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub sublayers: Vec<Arc<LayerNode>>,
}

impl Group {
    pub fn new(name: impl Into<String>, sublayers: Vec<LayerNode>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            sublayers: sublayers.into_iter().map(Arc::new).collect(),
        }
    }
}

/// A node below a top-level layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LayerNode {
    Group(Group),
    Leaf(Leaf),
}

/// Picks the variant by the presence of a `sublayers` key, so a malformed
/// field reports its own error.
impl<'de> Deserialize<'de> for LayerNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let node = if value.get("sublayers").is_some() {
            Group::deserialize(value).map(LayerNode::Group)
        } else {
            Leaf::deserialize(value).map(LayerNode::Leaf)
        };
        node.map_err(de::Error::custom)
    }
}

impl LayerNode {
    pub fn leaf(name: impl Into<String>, visibility: bool) -> Self {
        LayerNode::Leaf(Leaf::new(name).visible(visibility))
    }

    pub fn group(name: impl Into<String>, sublayers: Vec<LayerNode>) -> Self {
        LayerNode::Group(Group::new(name, sublayers))
    }

    pub fn name(&self) -> &str {
        match self {
            LayerNode::Group(g) => &g.name,
            LayerNode::Leaf(l) => &l.name,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            LayerNode::Group(g) => &g.title,
            LayerNode::Leaf(l) => &l.title,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            LayerNode::Leaf(l) => Some(l),
            LayerNode::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            LayerNode::Group(g) => Some(g),
            LayerNode::Leaf(_) => None,
        }
    }

    /// Direct children; empty for a leaf.
    pub fn sublayers(&self) -> &[Arc<LayerNode>] {
        match self {
            LayerNode::Group(g) => &g.sublayers,
            LayerNode::Leaf(_) => &[],
        }
    }
}

impl From<Leaf> for LayerNode {
    fn from(leaf: Leaf) -> Self {
        LayerNode::Leaf(leaf)
    }
}

impl From<Group> for LayerNode {
    fn from(group: Group) -> Self {
        LayerNode::Group(group)
    }
}

/// A top-level map layer: the root group of a layer tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    /// Base service URL.
    pub url: String,
    /// Placement tag; layers tagged `background` stay out of the tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// The layer's own on/off flag, independent of its sublayers.
    pub visibility: bool,
    pub sublayers: Vec<Arc<LayerNode>>,
    /// Request parameters derived from `sublayers`.
    pub params: LayerParams,
}

/// Incoming `params` are ignored and derived again from the sublayers.
impl<'de> Deserialize<'de> for Layer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct LayerData {
            id: String,
            #[serde(default)]
            name: String,
            #[serde(default)]
            title: String,
            #[serde(rename = "type", default)]
            kind: ServiceKind,
            #[serde(default)]
            url: String,
            #[serde(default)]
            group: Option<String>,
            #[serde(default = "default_true")]
            visibility: bool,
            #[serde(default)]
            sublayers: Vec<Arc<LayerNode>>,
        }

        let data = LayerData::deserialize(deserializer)?;
        let mut layer = Layer {
            id: data.id,
            name: data.name,
            title: data.title,
            kind: data.kind,
            url: data.url,
            group: data.group,
            visibility: data.visibility,
            sublayers: data.sublayers,
            params: LayerParams::default(),
        };
        layer.refresh_params();
        Ok(layer)
    }
}

impl Layer {
    /// Creates a visible layer with freshly derived params.
    pub fn new(id: impl Into<String>, sublayers: Vec<LayerNode>) -> Self {
        let id = id.into();
        let mut layer = Self {
            name: id.clone(),
            title: id.clone(),
            id,
            kind: ServiceKind::Unknown,
            url: String::new(),
            group: None,
            visibility: true,
            sublayers: sublayers.into_iter().map(Arc::new).collect(),
            params: LayerParams::default(),
        };
        layer.refresh_params();
        layer
    }

    /// Turns this layer into a WMS layer served from `url`.
    pub fn wms(mut self, url: impl Into<String>) -> Self {
        self.kind = ServiceKind::Wms;
        self.url = url.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Recomputes `params` from the current sublayers.
    pub fn refresh_params(&mut self) {
        self.params = build_params(&self.sublayers);
    }
}

fn default_opacity() -> u8 {
    MAX_OPACITY
}

fn default_true() -> bool {
    true
}
