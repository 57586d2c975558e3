//! Sentinel strings and fixed parsing bounds for the catalog source.
//!
//! The placeholders below are the only markers the site is known to emit for
//! missing or invalid card fields. A new placeholder on the source side has to
//! be added here before it is recognized as a drop signal.

// Card-level placeholders
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const PRICE_UNAVAILABLE: &str = "Price Unavailable";
pub const NOT_RATED: &str = "Not Rated";

// Valid rating bounds after parsing
pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// Format of the capture timestamp stamped on every clean record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Optional configuration file read by `Config::load`.
pub const CONFIG_PATH: &str = "config.toml";
