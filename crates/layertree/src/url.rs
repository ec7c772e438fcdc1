//! Page URL state synchronization.
//!
//! Visibility edits push the serialized `LAYERS` list into the page URL so
//! the current view can be bookmarked. The URL itself lives outside this
//! crate; [`UrlSync`] is the boundary, [`UrlParams`] an in-memory
//! implementation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

/// A set of URL parameter updates. An empty value removes the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlPatch(IndexMap<String, String>);

impl UrlPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut patch = Self::new();
        patch.set(key, value);
        patch
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Receives URL parameter updates.
pub trait UrlSync {
    fn update_params(&mut self, patch: &UrlPatch);
}

/// In-memory URL query state, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    params: IndexMap<String, String>,
}

impl UrlParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string, with or without the leading `?`.
    ///
    /// # Example
    ///
    /// ```
    /// use layertree::url::UrlParams;
    ///
    /// let params = UrlParams::from_query("?l=a%2Cb&c=1");
    /// assert_eq!(params.get("l"), Some("a,b"));
    /// assert_eq!(params.to_query(), "l=a%2Cb&c=1");
    /// ```
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            params: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Renders the parameters as an `application/x-www-form-urlencoded` query.
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}

impl UrlSync for UrlParams {
    fn update_params(&mut self, patch: &UrlPatch) {
        for (key, value) in patch.iter() {
            if value.is_empty() {
                self.params.shift_remove(key);
            } else {
                self.params.insert(key.to_string(), value.to_string());
            }
        }
        debug!(keys = patch.len(), "url params updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_insert_order() {
        let mut patch = UrlPatch::new();
        patch.set("b", "1");
        patch.set("a", "2");
        let keys: Vec<_> = patch.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_update_replaces_value() {
        let mut params = UrlParams::from_query("l=a&t=1");
        params.update_params(&UrlPatch::single("l", "a,b"));
        assert_eq!(params.get("l"), Some("a,b"));
        assert_eq!(params.to_query(), "l=a%2Cb&t=1");
    }

    #[test]
    fn test_empty_value_removes_key() {
        let mut params = UrlParams::from_query("l=a&t=1");
        params.update_params(&UrlPatch::single("l", ""));
        assert_eq!(params.get("l"), None);
        assert_eq!(params.to_query(), "t=1");
    }

    #[test]
    fn test_patch_serializes_as_object() {
        let patch = UrlPatch::single("l", "x,y");
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"l": "x,y"})
        );
    }

    #[test]
    fn test_empty_query() {
        let params = UrlParams::from_query("");
        assert!(params.is_empty());
        assert_eq!(params.to_query(), "");
    }
}
