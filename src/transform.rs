use crate::config::Config;
use crate::constants::{MAX_RATING, MIN_RATING, UNKNOWN_PRODUCT};
use crate::types::{CleanProduct, Gender, RawProduct, Size};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

static PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$?([\d,]+\.?\d*)").unwrap());
static RATING_OF_FIVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.?\d*)\s*/\s*5").unwrap());
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.?\d*)").unwrap());
static COLORS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").unwrap());

/// Why a raw record was excluded from the clean set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DropReason {
    UnknownProduct,
    PriceUnavailable,
    Price,
    Rating,
    RatingRange,
    Colors,
    Size,
    Gender,
    Duplicate,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::UnknownProduct => "unknown product title",
            DropReason::PriceUnavailable => "price unavailable",
            DropReason::Price => "unparseable price",
            DropReason::Rating => "unparseable rating",
            DropReason::RatingRange => "rating out of range",
            DropReason::Colors => "unparseable color count",
            DropReason::Size => "unrecognized size",
            DropReason::Gender => "unrecognized gender",
            DropReason::Duplicate => "duplicate record",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a USD price string like `"$102.15"` to the target currency.
pub fn clean_price(price: &str, usd_to_idr_rate: f64) -> Option<f64> {
    let price = price.trim();
    if price.is_empty() || price.to_lowercase().contains("unavailable") {
        return None;
    }
    let captures = PRICE_RE.captures(price)?;
    let usd: f64 = captures[1].replace(',', "").parse().ok()?;
    Some(usd * usd_to_idr_rate)
}

/// Extracts the numeric rating from strings like `"Rating: ⭐ 3.9 / 5"`.
/// Range checking happens in `clean_product` so the drop reason stays
/// distinguishable.
pub fn clean_rating(rating: &str) -> Option<f64> {
    let rating = rating.trim();
    if rating.is_empty() || rating.contains("Invalid") || rating.contains("Not Rated") {
        return None;
    }
    let captures = RATING_OF_FIVE_RE
        .captures(rating)
        .or_else(|| NUMBER_RE.captures(rating))?;
    captures[1].parse().ok()
}

/// Extracts the count from strings like `"3 Colors"`.
pub fn clean_colors(colors: &str) -> Option<u32> {
    let captures = COLORS_RE.captures(colors.trim())?;
    captures[1].parse().ok()
}

/// Strips the `"Size:"` label and matches one of the known sizes.
pub fn clean_size(size: &str) -> Option<Size> {
    let value = size.replace("Size:", "");
    Size::parse(value.trim())
}

/// Strips the `"Gender:"` label and matches one of the known labels.
pub fn clean_gender(gender: &str) -> Option<Gender> {
    let value = gender.replace("Gender:", "");
    Gender::parse(value.trim())
}

/// Single validation pass over one raw record. The first failing field
/// decides the drop reason; a record is never partially populated.
pub fn clean_product(
    raw: &RawProduct,
    config: &Config,
    timestamp: &str,
) -> Result<CleanProduct, DropReason> {
    let title = raw.title.trim();
    if title.is_empty() || title == UNKNOWN_PRODUCT {
        return Err(DropReason::UnknownProduct);
    }

    if raw.price.to_lowercase().contains("unavailable") {
        return Err(DropReason::PriceUnavailable);
    }
    let price = clean_price(&raw.price, config.usd_to_idr_rate).ok_or(DropReason::Price)?;

    let rating = clean_rating(&raw.rating).ok_or(DropReason::Rating)?;
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(DropReason::RatingRange);
    }

    let colors = clean_colors(&raw.colors).ok_or(DropReason::Colors)?;
    let size = clean_size(&raw.size).ok_or(DropReason::Size)?;
    let gender = clean_gender(&raw.gender).ok_or(DropReason::Gender)?;

    Ok(CleanProduct {
        title: title.to_string(),
        price,
        rating,
        colors,
        size,
        gender,
        timestamp: timestamp.to_string(),
    })
}

/// Outcome of transforming one batch of raw records.
/// Invariant: `seen == retained() + dropped()`.
pub struct TransformReport {
    pub products: Vec<CleanProduct>,
    pub seen: usize,
    pub drops: Vec<DropReason>,
}

impl TransformReport {
    pub fn retained(&self) -> usize {
        self.products.len()
    }

    pub fn dropped(&self) -> usize {
        self.drops.len()
    }
}

/// Cleans a batch of raw records, dropping whole records on any field
/// failure and keeping per-reason accounting.
pub fn transform(raws: &[RawProduct], config: &Config, timestamp: &str) -> TransformReport {
    let mut products = Vec::with_capacity(raws.len());
    let mut drops = Vec::new();

    for raw in raws {
        match clean_product(raw, config, timestamp) {
            Ok(product) => products.push(product),
            Err(reason) => {
                debug!(title = %raw.title, %reason, "Dropping record");
                drops.push(reason);
            }
        }
    }

    TransformReport {
        products,
        seen: raws.len(),
        drops,
    }
}

/// Tally of drops per reason, ordered for stable reporting.
pub fn drop_counts(drops: &[DropReason]) -> BTreeMap<DropReason, usize> {
    let mut counts = BTreeMap::new();
    for reason in drops {
        *counts.entry(*reason).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_raw() -> RawProduct {
        RawProduct {
            title: "T-shirt 2".to_string(),
            price: "$102.15".to_string(),
            rating: "Rating: ⭐ 3.9 / 5".to_string(),
            colors: "3 Colors".to_string(),
            size: "Size: M".to_string(),
            gender: "Gender: Women".to_string(),
        }
    }

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn price_conversion_is_linear() {
        assert_eq!(clean_price("$102.15", 16_000.0), Some(102.15 * 16_000.0));
        assert_eq!(clean_price("$1,250.00", 16_000.0), Some(1_250.0 * 16_000.0));
        assert_eq!(clean_price("$5", 2.0), Some(10.0));
    }

    #[test]
    fn unavailable_price_is_rejected() {
        assert_eq!(clean_price("Price Unavailable", 16_000.0), None);
        assert_eq!(clean_price("price unavailable", 16_000.0), None);
        assert_eq!(clean_price("", 16_000.0), None);
    }

    #[test]
    fn rating_prefers_the_out_of_five_form() {
        assert_eq!(clean_rating("Rating: ⭐ 3.9 / 5"), Some(3.9));
        assert_eq!(clean_rating("4.2"), Some(4.2));
        assert_eq!(clean_rating("Rating: ⭐ Invalid Rating / 5"), None);
        assert_eq!(clean_rating("Not Rated"), None);
    }

    #[test]
    fn colors_extracts_the_count() {
        assert_eq!(clean_colors("3 Colors"), Some(3));
        assert_eq!(clean_colors("10 Colors"), Some(10));
        assert_eq!(clean_colors("Colors"), None);
        assert_eq!(clean_colors(""), None);
    }

    #[test]
    fn size_and_gender_must_match_known_values() {
        assert_eq!(clean_size("Size: M"), Some(Size::M));
        assert_eq!(clean_size("Size: XXL"), Some(Size::XXL));
        assert_eq!(clean_size("Size: 44"), None);
        assert_eq!(clean_gender("Gender: Women"), Some(Gender::Women));
        assert_eq!(clean_gender("Gender: Unisex"), Some(Gender::Unisex));
        assert_eq!(clean_gender("Gender: ???"), None);
    }

    #[test]
    fn valid_record_converts_completely() {
        let product = clean_product(&valid_raw(), &config(), "2025-01-02 10:00:00").unwrap();
        assert_eq!(product.title, "T-shirt 2");
        assert_eq!(product.price, 102.15 * 16_000.0);
        assert_eq!(product.rating, 3.9);
        assert_eq!(product.colors, 3);
        assert_eq!(product.size, Size::M);
        assert_eq!(product.gender, Gender::Women);
        assert_eq!(product.timestamp, "2025-01-02 10:00:00");
    }

    #[test]
    fn unknown_product_is_always_dropped() {
        let mut raw = valid_raw();
        raw.title = "Unknown Product".to_string();
        assert_eq!(
            clean_product(&raw, &config(), "ts"),
            Err(DropReason::UnknownProduct)
        );
    }

    #[test]
    fn unavailable_price_is_always_dropped() {
        let mut raw = valid_raw();
        raw.price = "Price Unavailable".to_string();
        assert_eq!(
            clean_product(&raw, &config(), "ts"),
            Err(DropReason::PriceUnavailable)
        );
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        let mut raw = valid_raw();
        raw.rating = "Rating: ⭐ 1.0 / 5".to_string();
        assert!(clean_product(&raw, &config(), "ts").is_ok());

        raw.rating = "Rating: ⭐ 5.0 / 5".to_string();
        assert!(clean_product(&raw, &config(), "ts").is_ok());

        raw.rating = "Rating: ⭐ 0.5 / 5".to_string();
        assert_eq!(
            clean_product(&raw, &config(), "ts"),
            Err(DropReason::RatingRange)
        );

        raw.rating = "Rating: ⭐ 5.1 / 5".to_string();
        assert_eq!(
            clean_product(&raw, &config(), "ts"),
            Err(DropReason::RatingRange)
        );
    }

    #[test]
    fn every_record_is_either_retained_or_dropped() {
        let mut bad_rating = valid_raw();
        bad_rating.rating = "Not Rated".to_string();
        let mut bad_size = valid_raw();
        bad_size.size = "Size: 44".to_string();

        let raws = vec![valid_raw(), bad_rating, bad_size];
        let report = transform(&raws, &config(), "ts");

        assert_eq!(report.seen, 3);
        assert_eq!(report.retained(), 1);
        assert_eq!(report.dropped(), 2);
        assert_eq!(report.seen, report.retained() + report.dropped());

        let counts = drop_counts(&report.drops);
        assert_eq!(counts[&DropReason::Rating], 1);
        assert_eq!(counts[&DropReason::Size], 1);
    }
}
