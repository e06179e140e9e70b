// src/extract/html.rs
// =============================================================================
// CSS-selector based extraction with the `scraper` crate.
//
// Listing page:  container* -> link            => product page URLs
// Product page:  name, image, variant* -> (label, price) => ProductRecords
//
// Missing fields come back as empty strings rather than errors; only a
// document that isn't markup at all fails.
// =============================================================================

use scraper::{ElementRef, Html};

use super::selectors::{CompiledField, SelectorConfig};
use super::Extractor;
use crate::error::ExtractionError;
use crate::fetch::FetchResult;
use crate::model::ProductRecord;

pub struct SelectorExtractor {
    container: CompiledField,
    link: CompiledField,
    name: CompiledField,
    image: CompiledField,
    variant: CompiledField,
    variant_label: CompiledField,
    price: CompiledField,
}

impl SelectorExtractor {
    // Compiles every selector up front so a typo in a selector file fails
    // before the first request is sent
    pub fn new(config: &SelectorConfig) -> Result<Self, ExtractionError> {
        Ok(Self {
            container: CompiledField::compile("container", &config.container)?,
            link: CompiledField::compile("link", &config.link)?,
            name: CompiledField::compile("name", &config.name)?,
            image: CompiledField::compile("image", &config.image)?,
            variant: CompiledField::compile("variant", &config.variant)?,
            variant_label: CompiledField::compile("variant_label", &config.variant_label)?,
            price: CompiledField::compile("price", &config.price)?,
        })
    }
}

impl Extractor for SelectorExtractor {
    fn extract_listing_links(&self, page: &FetchResult) -> Result<Vec<String>, ExtractionError> {
        let document = parse(page)?;

        // One slot per container, so a card without a link keeps the cards
        // around it apart
        let mut slots: Vec<Option<String>> = document
            .select(&self.container.selector)
            .map(|container| {
                first_value(container, &self.link)
                    .map(|href| href.trim().to_string())
                    .filter(|href| !href.is_empty())
            })
            .collect();

        // Only back-to-back repeats are dropped
        slots.dedup();

        Ok(slots.into_iter().flatten().collect())
    }

    fn extract_product_records(&self, page: &FetchResult) -> Result<Vec<ProductRecord>, ExtractionError> {
        let document = parse(page)?;
        let root = document.root_element();

        let base_name = first_value(root, &self.name).unwrap_or_default();
        // Every variant gets the first image on the page
        let image = first_value(root, &self.image).unwrap_or_default();

        let records = document
            .select(&self.variant.selector)
            .map(|variant| {
                let label = first_value(variant, &self.variant_label).unwrap_or_default();
                let price = first_value(variant, &self.price).unwrap_or_default();
                ProductRecord::new(format!("{base_name} - {label}"), price, image.clone())
            })
            .collect();

        Ok(records)
    }
}

fn parse(page: &FetchResult) -> Result<Html, ExtractionError> {
    let body = page.document.trim();
    if body.is_empty() || !body.contains('<') {
        return Err(ExtractionError::NotMarkup {
            url: page.final_url.clone(),
        });
    }
    Ok(Html::parse_document(body))
}

// Value of the first element under `scope` matching `field`
//
// Attribute values come back verbatim; element text is trimmed.
fn first_value(scope: ElementRef<'_>, field: &CompiledField) -> Option<String> {
    let element = scope.select(&field.selector).next()?;
    match &field.attr {
        Some(attr) => Some(element.value().attr(attr)?.to_string()),
        None => Some(element.text().collect::<String>().trim().to_string()),
    }
}
