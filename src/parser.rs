use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};
use crate::models::ProductRecord;

pub const DEFAULT_ORIGIN: &str = "https://www.lowes.com";
pub const TILE_SELECTOR: &str = "div.tile-group__item";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Price,
    ImageUrl,
    ProductUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Text,
    Attr(&'static str),
    /// An attribute holding a link, made absolute against the site origin.
    Link(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub selector: &'static str,
    pub source: Source,
}

pub const DEFAULT_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Title,
        selector: ".tile-title",
        source: Source::Text,
    },
    FieldRule {
        field: Field::Price,
        selector: ".tile-price__dollars",
        source: Source::Text,
    },
    FieldRule {
        field: Field::ImageUrl,
        selector: "img.product-image",
        source: Source::Attr("src"),
    },
    FieldRule {
        field: Field::ProductUrl,
        selector: "a.tile",
        source: Source::Link("href"),
    },
];

struct CompiledRule {
    rule: FieldRule,
    selector: Selector,
}

/// Turns a listing page into product records using a fixed rule table.
pub struct Extractor {
    origin: String,
    tile: Selector,
    rules: Vec<CompiledRule>,
}

impl Extractor {
    pub fn new(origin: &str) -> Result<Self> {
        Self::with_rules(origin, TILE_SELECTOR, DEFAULT_RULES)
    }

    pub fn with_rules(origin: &str, tile_selector: &str, rules: &[FieldRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    rule: *rule,
                    selector: compile(rule.selector)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            origin: origin.trim_end_matches('/').to_string(),
            tile: compile(tile_selector)?,
            rules,
        })
    }

    pub fn extract(&self, html: &str) -> Vec<ProductRecord> {
        let doc = Html::parse_document(html);

        doc.select(&self.tile)
            .map(|tile| self.extract_tile(tile))
            .filter(|record| !record.is_empty())
            .collect()
    }

    fn extract_tile(&self, tile: ElementRef<'_>) -> ProductRecord {
        let mut record = ProductRecord::default();
        for compiled in &self.rules {
            let Some(element) = tile.select(&compiled.selector).next() else {
                continue;
            };
            let value = match compiled.rule.source {
                Source::Text => text_of(element),
                Source::Attr(name) => element.value().attr(name).map(str::to_string),
                Source::Link(name) => element
                    .value()
                    .attr(name)
                    .map(|href| absolutize(&self.origin, href)),
            };
            if value.is_some() {
                assign(&mut record, compiled.rule.field, value);
            }
        }
        record
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn text_of(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn assign(record: &mut ProductRecord, field: Field, value: Option<String>) {
    match field {
        Field::Title => record.title = value,
        Field::Price => record.price = value,
        Field::ImageUrl => record.image_url = value,
        Field::ProductUrl => record.product_url = value,
    }
}

/// Site-relative links (`/pl/...`) get the origin prefixed; anything else is
/// kept as-is.
pub fn absolutize(origin: &str, href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), href)
    } else {
        href.to_string()
    }
}
