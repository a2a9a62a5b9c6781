use serde::{Deserialize, Serialize};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
}

impl ProductRecord {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.product_url.is_none()
    }
}

/// What scraping one leaf produced. Serialized inline, so a result carries
/// either a `products` key or an `error` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOutcome {
    Products(Vec<ProductRecord>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub name: String,
    pub url: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
    pub scraped_at: String,
}

impl PageResult {
    pub fn success(name: &str, url: &str, products: Vec<ProductRecord>) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            outcome: PageOutcome::Products(products),
            scraped_at: timestamp(),
        }
    }

    pub fn failure(name: &str, url: &str, error: String) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            outcome: PageOutcome::Error(error),
            scraped_at: timestamp(),
        }
    }

    pub fn products(&self) -> Option<&[ProductRecord]> {
        match &self.outcome {
            PageOutcome::Products(products) => Some(products.as_slice()),
            PageOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            PageOutcome::Error(message) => Some(message.as_str()),
            PageOutcome::Products(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, PageOutcome::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: String,
    pub total_pages: usize,
    pub results: Vec<PageResult>,
}

impl RunReport {
    pub fn new(total_pages: usize, results: Vec<PageResult>) -> Self {
        Self {
            timestamp: timestamp(),
            total_pages,
            results,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| !r.is_error()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_error()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serializes_products_key_only() {
        let result = PageResult::success(
            "Conduit",
            "https://x",
            vec![ProductRecord {
                title: Some("Pipe".into()),
                ..Default::default()
            }],
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["products"], json!([{"title": "Pipe"}]));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failure_serializes_error_key_only() {
        let result = PageResult::failure("Conduit", "https://x", "timed out".into());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["error"], json!("timed out"));
        assert!(value.get("products").is_none());
    }

    #[test]
    fn test_product_keys() {
        let record = ProductRecord {
            title: None,
            price: Some("4".into()),
            image_url: Some("https://img/1.jpg".into()),
            product_url: Some("https://www.lowes.com/pd/1".into()),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"price": "4", "image": "https://img/1.jpg", "url": "https://www.lowes.com/pd/1"})
        );
    }

    #[test]
    fn test_key_order() {
        let result = PageResult::failure("n", "u", "e".into());
        let text = serde_json::to_string(&result).unwrap();
        let name = text.find("\"name\"").unwrap();
        let error = text.find("\"error\"").unwrap();
        let scraped = text.find("\"scraped_at\"").unwrap();
        assert!(name < error && error < scraped);
    }

    #[test]
    fn test_timestamp_format() {
        let stamp = timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_report_counts() {
        let report = RunReport::new(
            3,
            vec![
                PageResult::success("a", "a", vec![]),
                PageResult::failure("b", "b", "boom".into()),
                PageResult::success("c", "c", vec![]),
            ],
        );
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
    }
}
