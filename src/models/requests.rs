//! Request DTOs for the gateway API
//!
//! Query strings carrying per-call cache control.

use serde::Deserialize;

use crate::cache::CacheControl;
use crate::styles::StyleFilter;

/// Query string accepted by every cached read route
///
/// # Fields
/// - `cache`: consult and populate the cache (instance default if absent)
/// - `force`: evict before fetching (instance default if absent)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControlQuery {
    #[serde(default)]
    pub cache: Option<bool>,
    #[serde(default)]
    pub force: Option<bool>,
}

impl ControlQuery {
    /// Returns the control block, or `None` when the query set nothing.
    pub fn control(&self) -> Option<CacheControl> {
        control_from(self.cache, self.force)
    }
}

/// Query string for `GET /files/:file_key/nodes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodesQuery {
    /// Comma-separated node ids
    #[serde(default)]
    pub ids: Option<String>,
    #[serde(default)]
    pub cache: Option<bool>,
    #[serde(default)]
    pub force: Option<bool>,
}

impl NodesQuery {
    pub fn control(&self) -> Option<CacheControl> {
        control_from(self.cache, self.force)
    }

    /// Node ids, with an empty value treated as absent.
    pub fn ids(&self) -> Option<&str> {
        self.ids.as_deref().filter(|ids| !ids.is_empty())
    }
}

/// Query string for `GET /files/:file_key/css`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CssQuery {
    /// Only export styles of this type
    #[serde(default, rename = "type")]
    pub style_type: Option<String>,
    /// Comma-separated style names to export
    #[serde(default)]
    pub name: Option<String>,
    /// Class name prefix
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub cache: Option<bool>,
    #[serde(default)]
    pub force: Option<bool>,
}

impl CssQuery {
    pub fn control(&self) -> Option<CacheControl> {
        control_from(self.cache, self.force)
    }

    /// Builds the export filter; empty values are treated as absent.
    pub fn filter(&self) -> StyleFilter {
        let names: Vec<String> = self
            .name
            .iter()
            .flat_map(|names| names.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        StyleFilter {
            style_type: non_empty(&self.style_type),
            names: (!names.is_empty()).then_some(names),
            prefix: non_empty(&self.prefix),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|value| !value.is_empty())
}

fn control_from(cache: Option<bool>, force: Option<bool>) -> Option<CacheControl> {
    if cache.is_none() && force.is_none() {
        None
    } else {
        Some(CacheControl { cache, force })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_control() {
        let query: ControlQuery = serde_json::from_str("{}").unwrap();
        assert!(query.control().is_none());
    }

    #[test]
    fn test_force_only() {
        let query: ControlQuery = serde_json::from_str(r#"{"force": true}"#).unwrap();
        assert_eq!(query.control(), Some(CacheControl::refresh()));
    }

    #[test]
    fn test_nodes_query_empty_ids() {
        let query = NodesQuery {
            ids: Some(String::new()),
            ..Default::default()
        };
        assert!(query.ids().is_none());
    }

    #[test]
    fn test_nodes_query_with_control() {
        let query: NodesQuery =
            serde_json::from_str(r#"{"ids": "1:2", "cache": false}"#).unwrap();
        assert_eq!(query.ids(), Some("1:2"));
        assert_eq!(query.control(), Some(CacheControl::bypass()));
    }

    #[test]
    fn test_css_query_filter() {
        let query: CssQuery = serde_json::from_str(
            r#"{"type": "FILL", "name": "Primary, Secondary,", "prefix": "", "force": true}"#,
        )
        .unwrap();

        let filter = query.filter();
        assert_eq!(filter.style_type.as_deref(), Some("FILL"));
        assert_eq!(
            filter.names,
            Some(vec!["Primary".to_string(), "Secondary".to_string()])
        );
        assert_eq!(filter.prefix, None);
        assert_eq!(query.control(), Some(CacheControl::refresh()));
    }

    #[test]
    fn test_empty_css_query_exports_everything() {
        assert_eq!(CssQuery::default().filter(), StyleFilter::default());
    }
}
