//! Boundary to the application state that owns the layers.
//!
//! The tree never keeps its own copy of a layer between edits: it reads a
//! snapshot through [`LayerStore::layer`] and hands back a whole replacement
//! through [`LayerStore::change_layer_properties`].

use tracing::{debug, warn};

use crate::model::Layer;

pub trait LayerStore {
    /// The flat list of top-level layers, in display order.
    fn layers(&self) -> &[Layer];

    /// Whether the layer tree panel is expanded.
    fn expanded(&self) -> bool;

    /// Replaces the layer with id `id` by `layer`.
    fn change_layer_properties(&mut self, id: &str, layer: Layer);

    /// Sets the expanded flag of the layer tree panel.
    fn toggle_layertree(&mut self, expanded: bool);

    fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers().iter().find(|l| l.id == id)
    }
}

/// A [`LayerStore`] holding its layers in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    layers: Vec<Layer>,
    expanded: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            expanded: true,
        }
    }
}

impl MemoryStore {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self {
            layers,
            ..Self::default()
        }
    }

    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }
}

impl LayerStore for MemoryStore {
    fn layers(&self) -> &[Layer] {
        &self.layers
    }

    fn expanded(&self) -> bool {
        self.expanded
    }

    fn change_layer_properties(&mut self, id: &str, layer: Layer) {
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(slot) => {
                debug!(layer = id, "layer replaced");
                *slot = layer;
            }
            None => warn!(layer = id, "change for unknown layer dropped"),
        }
    }

    fn toggle_layertree(&mut self, expanded: bool) {
        self.expanded = expanded;
    }
}
