// Extraction against saved listing markup

use lowes_catalog_scraper::parser::{DEFAULT_ORIGIN, Extractor};

const LISTING: &str = include_str!("fixtures/listing.html");

fn extractor() -> Extractor {
    Extractor::new(DEFAULT_ORIGIN).unwrap()
}

#[test]
fn test_fixture_drops_empty_tiles() {
    // 3 tiles with at least one field, 2 with none
    let records = extractor().extract(LISTING);
    assert_eq!(records.len(), 3);
}

#[test]
fn test_fixture_full_tile() {
    let records = extractor().extract(LISTING);
    let first = &records[0];
    assert_eq!(first.title.as_deref(), Some("Carlon 1/2-in PVC Conduit"));
    assert_eq!(first.price.as_deref(), Some("4"));
    assert_eq!(
        first.image_url.as_deref(),
        Some("https://mobileimages.lowes.com/productimages/pvc.jpg")
    );
    assert_eq!(
        first.product_url.as_deref(),
        Some("https://www.lowes.com/pd/Carlon-1-2-in-PVC-Conduit/1000021578")
    );
}

#[test]
fn test_fixture_absolute_link_kept() {
    let records = extractor().extract(LISTING);
    assert_eq!(
        records[1].product_url.as_deref(),
        Some("https://www.lowes.com/pd/Southwire-EMT/3129875")
    );
    assert_eq!(records[1].image_url, None);
}

#[test]
fn test_fixture_price_only_tile() {
    let records = extractor().extract(LISTING);
    let last = &records[2];
    assert_eq!(last.price.as_deref(), Some("7"));
    assert_eq!(last.title, None);
    assert_eq!(last.product_url, None);
}

#[test]
fn test_page_without_tiles() {
    let records = extractor().extract("<html><body><p>No results</p></body></html>");
    assert!(records.is_empty());
}

#[test]
fn test_relative_href_rewritten() {
    let html = r#"<div class="tile-group__item"><a class="tile" href="/pl/foo/123"></a></div>"#;
    let records = extractor().extract(html);
    assert_eq!(
        records[0].product_url.as_deref(),
        Some("https://www.lowes.com/pl/foo/123")
    );
}

#[test]
fn test_absolute_href_unchanged() {
    let html = r#"<div class="tile-group__item"><a class="tile" href="https://example.com/x"></a></div>"#;
    let records = extractor().extract(html);
    assert_eq!(records[0].product_url.as_deref(), Some("https://example.com/x"));
}

#[test]
fn test_image_without_src_is_absent() {
    let html = r#"<div class="tile-group__item"><img class="product-image"></div>"#;
    assert!(extractor().extract(html).is_empty());
}
