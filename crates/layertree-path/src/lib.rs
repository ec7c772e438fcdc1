//! Index paths into map layer trees.
//!
//! A path is an ordered sequence of indices, each step descending into the
//! `sublayers` of the current node, starting at a top-level layer. The empty
//! path addresses the layer itself. Paths are formatted as `0/2/1`; a node's
//! menu key prefixes the path with the (escaped) layer id: `osm/0/2/1`.
//!
//! # Example
//!
//! ```
//! use layertree_path::{format_menu_key, parse_menu_key, parse_path};
//!
//! let path = parse_path("0/2/1").unwrap();
//! assert_eq!(path, vec![0, 2, 1]);
//!
//! let key = format_menu_key("osm", &path);
//! assert_eq!(key, "osm/0/2/1");
//! assert_eq!(parse_menu_key(&key).unwrap().path, path);
//! ```

use thiserror::Error;

pub mod types;
pub mod util;
pub mod validate;

pub use types::{MenuKey, Path, PathStep};
pub use util::{
    escape_id, format_menu_key, format_path, is_root, is_valid_index, parse_menu_key, parse_path,
    unescape_id,
};
pub use validate::{validate_path, validate_path_str, MAX_PATH_LENGTH};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("INVALID_KEY")]
    InvalidKey,
    #[error("Path too long")]
    PathTooLong,
}
