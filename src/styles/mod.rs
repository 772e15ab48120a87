//! Style Export Module
//!
//! Turns the fill styles of a design file into CSS background classes.
//!
//! For each `FILL` style the first node (depth-first) using it supplies the
//! paints; the style name becomes the class name and the paints become the
//! `background` value. Styles without a using node, or whose paints have no
//! CSS form, are skipped.

mod css;
mod document;

use serde::Deserialize;
use tracing::debug;

use crate::cache::CacheControl;
use crate::error::ApiError;
use crate::remote::DesignApi;

pub use css::{fill_to_css, to_class_name};
pub use document::{DesignFile, FileStyle, Node};

/// Style type that produces CSS rules
pub const FILL_STYLE: &str = "FILL";

// == Filter ==
/// Selects which styles are exported and how classes are named.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleFilter {
    /// Only styles of this type (`FILL`, `TEXT`, ...)
    pub style_type: Option<String>,
    /// Only styles with one of these exact names
    pub names: Option<Vec<String>>,
    /// Prepended to every class name
    pub prefix: Option<String>,
}

impl StyleFilter {
    pub fn matches(&self, style: &FileStyle) -> bool {
        if let Some(style_type) = &self.style_type {
            if *style_type != style.style_type {
                return false;
            }
        }
        match &self.names {
            Some(names) => names.iter().any(|name| *name == style.name),
            None => true,
        }
    }
}

// == Rendering ==
/// Builds one `.class { background: ...; }` rule per exportable fill style,
/// in style id order.
pub fn fill_style_rules(file: &DesignFile, filter: &StyleFilter) -> Vec<String> {
    let mut rules = Vec::new();

    for (id, style) in &file.styles {
        if !filter.matches(style) {
            continue;
        }
        if style.style_type != FILL_STYLE {
            debug!("Skipping {} style {}", style.style_type, style.name);
            continue;
        }

        let Some(node) = file
            .document
            .find(&|node: &Node| node.fill_style() == Some(id.as_str()))
        else {
            debug!("No node uses fill style {}", style.name);
            continue;
        };

        let class_name = to_class_name(&style.name, filter.prefix.as_deref());
        let background = node
            .fills
            .iter()
            .filter_map(fill_to_css)
            .collect::<Vec<_>>()
            .join(", ");
        if class_name.is_empty() || background.is_empty() {
            continue;
        }

        rules.push(format!(".{} {{ background: {}; }}", class_name, background));
    }

    rules
}

/// Renders the CSS stylesheet for `file`, one rule per line.
pub fn render_css(file: &DesignFile, filter: &StyleFilter) -> String {
    fill_style_rules(file, filter).join("\n")
}

/// Fetches a file through `api` and renders its fill styles as CSS.
///
/// `control` applies to the file fetch, so a cached API serves repeated
/// exports of the same file without another upstream request.
pub async fn export_css(
    api: &dyn DesignApi,
    file_key: &str,
    filter: &StyleFilter,
    control: Option<CacheControl>,
) -> Result<String, ApiError> {
    let file = api.get_file(file_key, control).await?;
    let file = DesignFile::deserialize(&file)
        .map_err(|e| ApiError::Malformed(format!("file {}: {}", file_key, e)))?;
    Ok(render_css(&file, filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::remote::DesignClient;
    use crate::Cached;
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    fn sample_file() -> Value {
        json!({
            "name": "Tokens",
            "document": {
                "id": "0:0",
                "type": "DOCUMENT",
                "children": [
                    {
                        "id": "1:1",
                        "type": "RECTANGLE",
                        "styles": {"fill": "S:1"},
                        "fills": [{"type": "SOLID", "color": {"r": 1, "g": 0, "b": 0}, "opacity": 0.5}]
                    },
                    {
                        "id": "1:2",
                        "type": "RECTANGLE",
                        "styles": {"fill": "S:2"},
                        "fills": [
                            {"type": "EMOJI"},
                            {"type": "IMAGE", "imageRef": "img1"}
                        ]
                    }
                ]
            },
            "styles": {
                "S:1": {"name": "Brand/Primary Red", "styleType": "FILL"},
                "S:2": {"name": "Hero", "styleType": "FILL"},
                "S:3": {"name": "Heading", "styleType": "TEXT"},
                "S:4": {"name": "Unused", "styleType": "FILL"}
            }
        })
    }

    fn parsed() -> DesignFile {
        DesignFile::deserialize(&sample_file()).unwrap()
    }

    #[test]
    fn test_render_all_fill_styles() {
        let css = render_css(&parsed(), &StyleFilter::default());

        assert_eq!(
            css,
            ".brand-primary-red { background: rgba(255, 0, 0, 0.5); }\n\
             .hero { background: url(img1); }"
        );
    }

    #[test]
    fn test_filter_by_name_and_prefix() {
        let filter = StyleFilter {
            names: Some(vec!["Hero".to_string()]),
            prefix: Some("ds".to_string()),
            ..Default::default()
        };

        assert_eq!(
            fill_style_rules(&parsed(), &filter),
            vec![".ds-hero { background: url(img1); }"]
        );
    }

    #[test]
    fn test_filter_by_type() {
        let text_only = StyleFilter {
            style_type: Some("TEXT".to_string()),
            ..Default::default()
        };
        assert!(fill_style_rules(&parsed(), &text_only).is_empty());

        let fill_only = StyleFilter {
            style_type: Some(FILL_STYLE.to_string()),
            ..Default::default()
        };
        assert_eq!(fill_style_rules(&parsed(), &fill_only).len(), 2);
    }

    #[tokio::test]
    async fn test_export_css_through_cached_client() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/files/tokens");
                then.status(200).json_body(sample_file());
            })
            .await;
        let client = DesignClient::new(server.base_url(), "secret-token").unwrap();
        let cached = Cached::wrap(client, CacheConfig::default());
        let filter = StyleFilter {
            names: Some(vec!["Brand/Primary Red".to_string()]),
            ..Default::default()
        };

        for _ in 0..2 {
            let css = export_css(&cached, "tokens", &filter, None).await.unwrap();
            assert_eq!(css, ".brand-primary-red { background: rgba(255, 0, 0, 0.5); }");
        }

        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn test_export_css_rejects_non_file_payload() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files/odd");
                then.status(200).json_body(json!({"status": 200}));
            })
            .await;
        let client = DesignClient::new(server.base_url(), "secret-token").unwrap();

        let result = export_css(&client, "odd", &StyleFilter::default(), None).await;

        assert!(matches!(result, Err(ApiError::Malformed(_))));
    }
}
