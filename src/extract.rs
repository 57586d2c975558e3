use crate::config::Config;
use crate::constants::{NOT_RATED, PRICE_UNAVAILABLE, UNKNOWN_PRODUCT};
use crate::error::{Result, ScraperError};
use crate::types::RawProduct;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Fetches catalog pages and parses the product cards out of them.
pub struct CatalogScraper {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogScraper {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Page 1 lives at the bare base URL; later pages append `pageN`.
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            format!("{}/", self.base_url)
        } else {
            format!("{}/page{}", self.base_url, page)
        }
    }

    /// Fetches a single catalog page. One attempt, no retry; a transport
    /// error or non-success status is surfaced to the caller.
    pub async fn fetch_page(&self, page: u32) -> Result<String> {
        let url = self.page_url(page);
        debug!(page, url = %url, "Fetching catalog page");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Fetch {
                page,
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    /// Fetch and parse one page into raw records.
    pub async fn scrape_page(&self, page: u32) -> Result<Vec<RawProduct>> {
        let html = self.fetch_page(page).await?;
        let products = parse_page(&html)?;
        info!(page, count = products.len(), "Parsed product cards");
        Ok(products)
    }
}

/// Parses every product card on a page. A page with no cards at all is a
/// parse error: the catalog always renders cards, so their absence means the
/// page structure changed.
pub fn parse_page(html: &str) -> Result<Vec<RawProduct>> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("div.collection-card").unwrap();

    let products: Vec<RawProduct> = document.select(&card_selector).map(parse_card).collect();
    if products.is_empty() {
        return Err(ScraperError::Parse(
            "no product cards found on the page".to_string(),
        ));
    }
    Ok(products)
}

/// Extracts the raw field strings from one card. Missing fields are filled
/// with their placeholder strings instead of failing, so the transform stage
/// decides whether the record survives.
fn parse_card(card: ElementRef) -> RawProduct {
    let title_selector = Selector::parse("h3.product-title").unwrap();
    let price_selector = Selector::parse("div.price-container span.price").unwrap();
    // Cards without a price render it as a plain paragraph instead
    let price_fallback_selector = Selector::parse("p.price").unwrap();
    let detail_selector = Selector::parse(r#"p[style*="777"]"#).unwrap();

    let title = card
        .select(&title_selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());

    let price = card
        .select(&price_selector)
        .next()
        .or_else(|| card.select(&price_fallback_selector).next())
        .map(element_text)
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| PRICE_UNAVAILABLE.to_string());

    let mut product = RawProduct {
        title,
        price,
        ..Default::default()
    };

    for detail in card.select(&detail_selector) {
        let text = element_text(detail);
        if text.contains("Rating:") {
            product.rating = text;
        } else if text.contains("Colors") {
            product.colors = text;
        } else if text.contains("Size:") {
            product.size = text;
        } else if text.contains("Gender:") {
            product.gender = text;
        }
    }

    // "Not Rated" cards label the rating paragraph differently
    if product.rating.is_empty() {
        for detail in card.select(&detail_selector) {
            let text = element_text(detail);
            if text.contains("Rated") {
                product.rating = text;
                break;
            }
        }
    }
    if product.rating.is_empty() {
        product.rating = NOT_RATED.to_string();
    }

    product
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
