//! Core logic of the `layertree` command-line tool.
//!
//! The binary parses arguments and does the I/O; everything here works on
//! strings so it can be tested without a process.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::addressing::resolve;
use crate::config::LayerTreeConfig;
use crate::error::TreeError;
use crate::model::Layer;
use crate::ops::{self, Edit};
use crate::url::UrlPatch;
use crate::view::{render_tree, TreeView, UiState};
use crate::visibility::{effective_visibility, layer_visibility};
use layertree_path::{parse_menu_key, parse_path, Path};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Tree(#[from] TreeError),
}

// ── Input ─────────────────────────────────────────────────────────────────

/// Parses a JSON array of layers.
pub fn load_layers(json: &str) -> Result<Vec<Layer>, CliError> {
    Ok(serde_json::from_str(json)?)
}

fn tree_path(path: &str) -> Result<Path, CliError> {
    Ok(parse_path(path).map_err(TreeError::from)?)
}

fn find<'a>(layers: &'a [Layer], id: &str) -> Result<&'a Layer, CliError> {
    layers
        .iter()
        .find(|l| l.id == id)
        .ok_or_else(|| TreeError::UnknownLayer(id.to_string()).into())
}

// ── Edits ─────────────────────────────────────────────────────────────────

/// An edit requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    ToggleLeaf,
    ToggleGroup,
    Opacity(u8),
}

#[derive(Serialize)]
struct EditOutput<'a> {
    layer: &'a Layer,
    url: &'a UrlPatch,
}

/// Applies one edit to the layer `id` and returns `{"layer": ..., "url": ...}`.
///
/// `path` uses the `0/1/2` form; the empty string is the layer itself.
pub fn run_edit(
    layers_json: &str,
    id: &str,
    path: &str,
    command: &EditCommand,
    config: &LayerTreeConfig,
) -> Result<String, CliError> {
    let layers = load_layers(layers_json)?;
    let layer = find(&layers, id)?;
    let path = tree_path(path)?;
    let edit: Edit = match command {
        EditCommand::ToggleLeaf => ops::toggle_leaf_with(layer, &path, config)?,
        EditCommand::ToggleGroup => ops::toggle_group_with(layer, &path, config)?,
        EditCommand::Opacity(value) => ops::change_opacity(layer, &path, *value)?,
    };
    let url = edit.url_patch.unwrap_or_default();
    let out = EditOutput {
        layer: &edit.layer,
        url: &url,
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

// ── Queries ───────────────────────────────────────────────────────────────

/// Returns the derived request params of the layer `id` as JSON.
pub fn layer_params(layers_json: &str, id: &str) -> Result<String, CliError> {
    let layers = load_layers(layers_json)?;
    let layer = find(&layers, id)?;
    Ok(serde_json::to_string_pretty(&layer.params)?)
}

/// Returns the effective visibility of the node at `path` of layer `id`.
pub fn node_visibility(layers_json: &str, id: &str, path: &str) -> Result<f64, CliError> {
    let layers = load_layers(layers_json)?;
    let layer = find(&layers, id)?;
    let path = tree_path(path)?;
    Ok(match resolve(layer, &path)?.as_node() {
        Some(node) => effective_visibility(node),
        None => layer_visibility(layer),
    })
}

/// Renders the whole tree, expanded, with the menu `active_menu` open.
pub fn render(
    layers_json: &str,
    active_menu: Option<&str>,
    config: &LayerTreeConfig,
) -> Result<TreeView, CliError> {
    let layers = load_layers(layers_json)?;
    let active_menu = active_menu
        .map(parse_menu_key)
        .transpose()
        .map_err(TreeError::from)?;
    let ui = UiState {
        expanded: true,
        active_menu: active_menu.as_ref(),
    };
    Ok(render_tree(&layers, &ui, config))
}

/// Renders the tree as JSON.
pub fn render_json(
    layers_json: &str,
    active_menu: Option<&str>,
    config: &LayerTreeConfig,
) -> Result<String, CliError> {
    let view = render(layers_json, active_menu, config)?;
    Ok(serde_json::to_string_pretty(&view)?)
}

/// Writes `out` and a trailing newline, then flushes.
pub fn write_output<W: Write>(mut writer: W, out: &str) -> Result<(), CliError> {
    writer.write_all(out.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Returns the layer list of a parsed JSON document, for callers that hand
/// over a whole state object (`{"layers": {"flat": [...]}}`) instead of a
/// bare array.
pub fn extract_layers(doc: &str) -> Result<String, CliError> {
    let value: Value = serde_json::from_str(doc)?;
    let layers = match value.pointer("/layers/flat") {
        Some(flat) => flat.clone(),
        None => value,
    };
    Ok(layers.to_string())
}
