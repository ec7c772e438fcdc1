//! layertree: the state model behind a map viewer's layer tree panel.
//!
//! A map layer owns a tree of sublayers: groups whose visibility is the
//! aggregate of their descendants, and leaves that carry the real on/off
//! flag, an opacity and a queryable bit. Edits never mutate a layer in place.
//! Each one returns a replacement [`Layer`] that shares every untouched
//! subtree with the input, plus the URL parameters to sync.
//!
//! # Example
//!
//! ```
//! use layertree::{ops, Layer, LayerNode};
//!
//! let layer = Layer::new(
//!     "osm",
//!     vec![LayerNode::group(
//!         "roads",
//!         vec![LayerNode::leaf("primary", true), LayerNode::leaf("tracks", false)],
//!     )],
//! );
//! let edit = ops::toggle_leaf(&layer, &[0, 1]).unwrap();
//! assert_eq!(edit.layer.params.layers, vec!["primary", "tracks"]);
//! assert_eq!(edit.url_patch.unwrap().get("l"), Some("primary,tracks"));
//! ```

pub mod addressing;
pub mod cli;
pub mod config;
pub mod error;
pub mod legend;
pub mod model;
pub mod ops;
pub mod params;
pub mod session;
pub mod store;
pub mod url;
pub mod view;
pub mod visibility;

pub use config::LayerTreeConfig;
pub use error::TreeError;
pub use model::{Group, Layer, LayerNode, Leaf, ServiceKind};
pub use ops::Edit;
pub use params::LayerParams;
pub use session::{Intent, LayerTreeSession};
pub use store::{LayerStore, MemoryStore};
pub use crate::url::{UrlParams, UrlPatch, UrlSync};
pub use visibility::Tristate;

pub use layertree_path::{MenuKey, Path, PathError};
