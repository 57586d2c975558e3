use crate::config::Config;
use crate::constants::TIMESTAMP_FORMAT;
use crate::error::{Result, ScraperError};
use crate::extract::CatalogScraper;
use crate::load::{load_all, Sink, SinkOutcome};
use crate::transform::{transform, DropReason};
use crate::types::CleanProduct;
use chrono::Local;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

/// Result of a complete ETL run.
#[derive(Debug)]
pub struct PipelineResult {
    pub pages_attempted: usize,
    pub pages_failed: usize,
    pub extracted: usize,
    pub retained: usize,
    pub drops: Vec<DropReason>,
    pub page_errors: Vec<String>,
    pub sink_outcomes: Vec<SinkOutcome>,
}

impl PipelineResult {
    pub fn dropped(&self) -> usize {
        self.drops.len()
    }

    pub fn sinks_ok(&self) -> bool {
        self.sink_outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Drives the extract -> transform -> load sequence over a list of pages.
/// Pages are processed strictly in order, one at a time.
pub struct Pipeline {
    config: Config,
    scraper: CatalogScraper,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let scraper = CatalogScraper::new(&config)?;
        Ok(Self { config, scraper })
    }

    /// Runs the full pipeline. A single page failing to fetch or parse is
    /// logged and the run continues with the next page; only a run where
    /// every page failed is an error.
    pub async fn run(&self, pages: &[u32], sinks: &[Box<dyn Sink>]) -> Result<PipelineResult> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        let mut products: Vec<CleanProduct> = Vec::new();
        let mut seen_keys = HashSet::new();
        let mut drops: Vec<DropReason> = Vec::new();
        let mut page_errors: Vec<String> = Vec::new();
        let mut extracted = 0usize;
        let mut pages_failed = 0usize;

        for (i, &page) in pages.iter().enumerate() {
            info!(page, "Scraping page {}/{}", i + 1, pages.len());
            println!("Scraping page {page} ({}/{})...", i + 1, pages.len());

            match self.scraper.scrape_page(page).await {
                Ok(raws) => {
                    extracted += raws.len();
                    let report = transform(&raws, &self.config, &timestamp);
                    drops.extend(report.drops.iter().copied());
                    for product in report.products {
                        if seen_keys.insert(product.dedup_key()) {
                            products.push(product);
                        } else {
                            drops.push(DropReason::Duplicate);
                        }
                    }
                }
                Err(e) => {
                    warn!(page, error = %e, "Failed to scrape page, continuing with next");
                    println!("⚠️  Page {page} failed: {e}");
                    page_errors.push(format!("page {page}: {e}"));
                    pages_failed += 1;
                }
            }

            if i + 1 < pages.len() && self.config.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
            }
        }

        if !pages.is_empty() && pages_failed == pages.len() {
            return Err(ScraperError::Pipeline(format!(
                "all {} pages failed to fetch",
                pages.len()
            )));
        }

        info!(
            extracted,
            retained = products.len(),
            dropped = drops.len(),
            "Transformation complete"
        );

        let sink_outcomes = if products.is_empty() {
            warn!("No clean records produced, skipping sinks");
            println!("⚠️  No clean records produced - skipping sinks");
            Vec::new()
        } else {
            load_all(sinks, &products).await
        };

        Ok(PipelineResult {
            pages_attempted: pages.len(),
            pages_failed,
            extracted,
            retained: products.len(),
            drops,
            page_errors,
            sink_outcomes,
        })
    }
}
