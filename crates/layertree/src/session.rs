//! Layer tree session: dispatches user intents to the store and URL state.
//!
//! A session is one rendering of the layer tree. It owns the only piece of
//! local state, the open edit menu, and borrows everything else from the
//! [`LayerStore`] on every intent.

use layertree_path::{parse_menu_key, MenuKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LayerTreeConfig;
use crate::error::TreeError;
use crate::model::Layer;
use crate::ops::{self, Edit};
use crate::store::LayerStore;
use crate::url::UrlSync;
use crate::view::{render_tree, TreeView, UiState};

/// A user action on the layer tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Intent {
    ToggleLeaf { layer: String, path: Vec<usize> },
    ToggleGroup { layer: String, path: Vec<usize> },
    ChangeOpacity { layer: String, path: Vec<usize>, value: u8 },
    ToggleEditMenu { key: String },
    ToggleTree,
}

/// Which node's edit menu is open, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    active: Option<MenuKey>,
}

impl MenuState {
    /// Opens the menu of `key`, or closes it if it is already open.
    ///
    /// Opening a menu closes any other one.
    ///
    /// # Example
    ///
    /// ```
    /// use layertree::session::MenuState;
    /// use layertree::MenuKey;
    ///
    /// let mut menu = MenuState::default();
    /// menu.toggle(MenuKey::new("osm", &[0]));
    /// menu.toggle(MenuKey::new("osm", &[1]));
    /// assert!(menu.is_open("osm", &[1]));
    /// assert!(!menu.is_open("osm", &[0]));
    /// menu.toggle(MenuKey::new("osm", &[1]));
    /// assert_eq!(menu.active(), None);
    /// ```
    pub fn toggle(&mut self, key: MenuKey) {
        if self.active.as_ref() == Some(&key) {
            self.active = None;
        } else {
            self.active = Some(key);
        }
    }

    pub fn active(&self) -> Option<&MenuKey> {
        self.active.as_ref()
    }

    pub fn is_open(&self, layer_id: &str, path: &[usize]) -> bool {
        self.active
            .as_ref()
            .is_some_and(|key| key.layer_id == layer_id && key.path.as_slice() == path)
    }
}

#[derive(Debug)]
pub struct LayerTreeSession<S, U> {
    store: S,
    url: U,
    config: LayerTreeConfig,
    menu: MenuState,
}

impl<S: LayerStore, U: UrlSync> LayerTreeSession<S, U> {
    pub fn new(store: S, url: U) -> Self {
        Self::with_config(store, url, LayerTreeConfig::default())
    }

    pub fn with_config(store: S, url: U, config: LayerTreeConfig) -> Self {
        Self {
            store,
            url,
            config,
            menu: MenuState::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn url(&self) -> &U {
        &self.url
    }

    pub fn config(&self) -> &LayerTreeConfig {
        &self.config
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn into_parts(self) -> (S, U) {
        (self.store, self.url)
    }

    pub fn apply(&mut self, intent: &Intent) -> Result<(), TreeError> {
        match intent {
            Intent::ToggleLeaf { layer, path } => self.toggle_leaf(layer, path),
            Intent::ToggleGroup { layer, path } => self.toggle_group(layer, path),
            Intent::ChangeOpacity { layer, path, value } => {
                self.change_opacity(layer, path, *value)
            }
            Intent::ToggleEditMenu { key } => self.toggle_edit_menu(key).map(|_| ()),
            Intent::ToggleTree => {
                self.toggle_tree();
                Ok(())
            }
        }
    }

    pub fn toggle_leaf(&mut self, layer_id: &str, path: &[usize]) -> Result<(), TreeError> {
        let edit = ops::toggle_leaf_with(self.current(layer_id)?, path, &self.config)?;
        self.commit(layer_id, edit);
        Ok(())
    }

    pub fn toggle_group(&mut self, layer_id: &str, path: &[usize]) -> Result<(), TreeError> {
        let edit = ops::toggle_group_with(self.current(layer_id)?, path, &self.config)?;
        self.commit(layer_id, edit);
        Ok(())
    }

    pub fn change_opacity(
        &mut self,
        layer_id: &str,
        path: &[usize],
        value: u8,
    ) -> Result<(), TreeError> {
        let edit = ops::change_opacity(self.current(layer_id)?, path, value)?;
        self.commit(layer_id, edit);
        Ok(())
    }

    /// Toggles the edit menu of the node named by the menu key `key`.
    ///
    /// Returns the key of the menu left open, if any.
    ///
    /// # Errors
    ///
    /// [`TreeError::Path`] if `key` is not a well-formed menu key.
    pub fn toggle_edit_menu(&mut self, key: &str) -> Result<Option<&MenuKey>, TreeError> {
        self.menu.toggle(parse_menu_key(key)?);
        debug!(menu = key, open = self.menu.active().is_some(), "edit menu toggled");
        Ok(self.menu.active())
    }

    pub fn toggle_tree(&mut self) {
        let expanded = !self.store.expanded();
        self.store.toggle_layertree(expanded);
        debug!(expanded, "layer tree toggled");
    }

    pub fn render(&self) -> TreeView {
        let ui = UiState {
            expanded: self.store.expanded(),
            active_menu: self.menu.active(),
        };
        render_tree(self.store.layers(), &ui, &self.config)
    }

    fn current(&self, layer_id: &str) -> Result<&Layer, TreeError> {
        self.store
            .layer(layer_id)
            .ok_or_else(|| TreeError::UnknownLayer(layer_id.to_string()))
    }

    fn commit(&mut self, layer_id: &str, edit: Edit) {
        if let Some(patch) = &edit.url_patch {
            self.url.update_params(patch);
        }
        self.store.change_layer_properties(layer_id, edit.layer);
    }
}
