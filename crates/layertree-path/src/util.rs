use crate::types::MenuKey;
use crate::validate::validate_path_str;
use crate::PathError;

/// Unescapes a layer id taken from a menu key.
///
/// `~1` is replaced with `/` and `~0` is replaced with `~`.
///
/// # Example
///
/// ```
/// use layertree_path::unescape_id;
///
/// assert_eq!(unescape_id("roads~1major"), "roads/major");
/// assert_eq!(unescape_id("a~0b"), "a~b");
/// ```
pub fn unescape_id(id: &str) -> String {
    if !id.contains('~') {
        return id.to_string();
    }
    // ~1 before ~0, otherwise "~01" would decode to "/"
    id.replace("~1", "/").replace("~0", "~")
}

/// Escapes a layer id so it can be embedded in a menu key.
///
/// # Example
///
/// ```
/// use layertree_path::escape_id;
///
/// assert_eq!(escape_id("roads/major"), "roads~1major");
/// assert_eq!(escape_id("plain"), "plain");
/// ```
pub fn escape_id(id: &str) -> String {
    if !id.contains('/') && !id.contains('~') {
        return id.to_string();
    }
    id.replace('~', "~0").replace('/', "~1")
}

/// Parse a slash-separated path string into indices.
///
/// The empty string is the root path.
///
/// # Errors
///
/// See [`validate_path_str`].
///
/// # Example
///
/// ```
/// use layertree_path::parse_path;
///
/// assert_eq!(parse_path("").unwrap(), Vec::<usize>::new());
/// assert_eq!(parse_path("0/2/1").unwrap(), vec![0, 2, 1]);
/// assert!(parse_path("0/x").is_err());
/// ```
pub fn parse_path(path: &str) -> Result<Vec<usize>, PathError> {
    validate_path_str(path)?;
    if path.is_empty() {
        return Ok(Vec::new());
    }
    path.split('/')
        .map(|step| step.parse().map_err(|_| PathError::InvalidIndex))
        .collect()
}

/// Format indices as a slash-separated path string.
///
/// # Example
///
/// ```
/// use layertree_path::format_path;
///
/// assert_eq!(format_path(&[]), "");
/// assert_eq!(format_path(&[0, 2, 1]), "0/2/1");
/// ```
pub fn format_path(path: &[usize]) -> String {
    let mut out = String::with_capacity(path.len() * 2);
    for (i, step) in path.iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        out.push_str(&step.to_string());
    }
    out
}

/// Format the menu key of a node: `<layer-id>/<path>`.
///
/// The root of a layer formats with a trailing slash (`"osm/"`).
///
/// # Example
///
/// ```
/// use layertree_path::format_menu_key;
///
/// assert_eq!(format_menu_key("osm", &[1, 0]), "osm/1/0");
/// assert_eq!(format_menu_key("osm", &[]), "osm/");
/// ```
pub fn format_menu_key(layer_id: &str, path: &[usize]) -> String {
    let mut out = escape_id(layer_id);
    out.push('/');
    out.push_str(&format_path(path));
    out
}

/// Parse a menu key back into a layer id and a path.
///
/// # Errors
///
/// - [`PathError::InvalidKey`] if the key has no `/` separator
/// - any error of [`parse_path`] for the path part
///
/// # Example
///
/// ```
/// use layertree_path::parse_menu_key;
///
/// let key = parse_menu_key("osm/1/0").unwrap();
/// assert_eq!(key.layer_id, "osm");
/// assert_eq!(key.path, vec![1, 0]);
/// ```
pub fn parse_menu_key(key: &str) -> Result<MenuKey, PathError> {
    let (id, path) = key.split_once('/').ok_or(PathError::InvalidKey)?;
    Ok(MenuKey {
        layer_id: unescape_id(id),
        path: parse_path(path)?,
    })
}

/// Check if a path addresses the top-level layer.
pub fn is_root(path: &[usize]) -> bool {
    path.is_empty()
}

/// Check if a string represents a canonical non-negative integer index.
///
/// # Example
///
/// ```
/// use layertree_path::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index(""));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_id() {
        assert_eq!(escape_id("foo"), "foo");
        assert_eq!(escape_id("a~b"), "a~0b");
        assert_eq!(escape_id("c/d"), "c~1d");
        assert_eq!(escape_id("~/"), "~0~1");
    }

    #[test]
    fn test_unescape_id() {
        assert_eq!(unescape_id("foo"), "foo");
        assert_eq!(unescape_id("a~0b~1c"), "a~b/c");
        assert_eq!(unescape_id("~01"), "~1");
    }

    #[test]
    fn test_parse_path_overflow() {
        assert_eq!(
            parse_path("99999999999999999999999999"),
            Err(PathError::InvalidIndex)
        );
    }

    #[test]
    fn test_parse_menu_key_root() {
        let key = parse_menu_key("osm/").unwrap();
        assert_eq!(key.layer_id, "osm");
        assert!(key.path.is_empty());
    }

    #[test]
    fn test_parse_menu_key_escaped_id() {
        let formatted = format_menu_key("a/b", &[4]);
        assert_eq!(formatted, "a~1b/4");
        let key = parse_menu_key(&formatted).unwrap();
        assert_eq!(key.layer_id, "a/b");
        assert_eq!(key.path, vec![4]);
    }

    #[test]
    fn test_parse_menu_key_missing_separator() {
        assert_eq!(parse_menu_key("osm"), Err(PathError::InvalidKey));
    }
}
