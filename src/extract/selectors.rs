// src/extract/selectors.rs
// =============================================================================
// Where on the page each field lives.
//
// The site-specific knowledge of the crawler is all here: which element is a
// product card, which link inside it leads to the product page, where the
// name/image/variants/prices are. It's plain data so it can be loaded from a
// JSON file with --selectors and so the extractor can be tested against
// fixture HTML without network access.
//
// Example file (every key is optional, missing keys keep the defaults):
//
//   {
//     "container": { "css": "li.product" },
//     "link":      { "css": "a.card-link", "attr": "href" },
//     "price":     { "css": "span.amount" }
//   }
// =============================================================================

use anyhow::{Context, Result};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ExtractionError;

/// A CSS selector plus where to read the value from
///
/// `attr: None` means "the element's text content".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelector {
    pub css: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,
}

impl FieldSelector {
    pub fn text(css: &str) -> Self {
        Self {
            css: css.to_string(),
            attr: None,
        }
    }

    pub fn attr(css: &str, attr: &str) -> Self {
        Self {
            css: css.to_string(),
            attr: Some(attr.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One element per product card on a listing page
    pub container: FieldSelector,
    /// Product page link, looked up inside a container
    pub link: FieldSelector,
    /// Base product name on a product page
    pub name: FieldSelector,
    /// Product image on a product page (only the first match is used)
    pub image: FieldSelector,
    /// One element per purchasable variant on a product page
    pub variant: FieldSelector,
    /// Variant label, looked up inside a variant element
    pub variant_label: FieldSelector,
    /// Variant price, looked up inside a variant element
    pub price: FieldSelector,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            container: FieldSelector::text(r#"div[class*="product-container"]"#),
            link: FieldSelector::attr(
                "a.product_img_link.pro_img_hover_scale.product-list-category-img",
                "href",
            ),
            name: FieldSelector::attr(
                r#"div[itemtype="http://schema.org/Product"] > meta[itemprop="name"]"#,
                "content",
            ),
            image: FieldSelector::attr(
                r#"div[itemtype="http://schema.org/Product"] > link[itemprop="image"]"#,
                "href",
            ),
            variant: FieldSelector::text("ul.attribute_radio_list.pundaline-variations > li"),
            variant_label: FieldSelector::text("span.radio_label"),
            price: FieldSelector::text("span.price_comb"),
        }
    }
}

impl SelectorConfig {
    // Loads a selector file, falling back to the defaults for missing keys
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading selector file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing selector file {}", path.display()))?;
        Ok(config)
    }
}

// A FieldSelector with its CSS already parsed
#[derive(Debug, Clone)]
pub(crate) struct CompiledField {
    pub(crate) selector: Selector,
    pub(crate) attr: Option<String>,
}

impl CompiledField {
    pub(crate) fn compile(field: &'static str, spec: &FieldSelector) -> Result<Self, ExtractionError> {
        let selector = Selector::parse(&spec.css).map_err(|e| ExtractionError::InvalidSelector {
            field,
            selector: spec.css.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            selector,
            attr: spec.attr.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_selectors_compile() {
        let config = SelectorConfig::default();
        for (name, field) in [
            ("container", &config.container),
            ("link", &config.link),
            ("name", &config.name),
            ("image", &config.image),
            ("variant", &config.variant),
            ("variant_label", &config.variant_label),
            ("price", &config.price),
        ] {
            assert!(CompiledField::compile(name, field).is_ok(), "{name} failed");
        }
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let err = CompiledField::compile("price", &FieldSelector::text("span[[")).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::InvalidSelector { field: "price", .. }
        ));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "price": {{ "css": "span.amount" }}, "link": {{ "css": "a.card", "attr": "href" }} }}"#
        )
        .unwrap();

        let config = SelectorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.price, FieldSelector::text("span.amount"));
        assert_eq!(config.link, FieldSelector::attr("a.card", "href"));
        assert_eq!(config.container, SelectorConfig::default().container);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(SelectorConfig::from_file(file.path()).is_err());
    }
}
