//! Normalized quote record produced by the provider parsers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel substring some providers emit in place of a real display name
/// when an instrument is unknown to them.
pub const UNAVAILABLE_MARKER: &str = "N/A";

/// A normalized price/name/change record for one instrument.
///
/// Quotes are ephemeral value objects created per refresh cycle. They are
/// not mutated after construction, with one exception: the name enhancer
/// may replace a low-confidence `name` in place before the [`QuoteSet`]
/// is handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Display name: a company name or index name.
    pub name: String,
    /// Current price, non-negative.
    pub price: f64,
    /// Signed delta against previous close (or provider-supplied).
    pub change: f64,
    /// Signed percentage change.
    pub change_percent: f64,
    /// Traded volume, kept as the provider's opaque string when available.
    pub volume: Option<String>,
    /// Turnover, kept as the provider's opaque string when available.
    pub turnover: Option<String>,
}

impl Quote {
    /// Whether this quote may be surfaced to the caller.
    ///
    /// A quote is valid only if the name is non-empty, carries no
    /// unavailable-marker, and the price is strictly positive. Parsers drop
    /// invalid quotes instead of inserting them into the result set.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.name.contains(UNAVAILABLE_MARKER) && self.price > 0.0
    }
}

/// Mapping from canonical code to quote. Keys are unique; iteration order
/// is not meaningful — callers re-order using their own code list.
pub type QuoteSet = HashMap<String, Quote>;
