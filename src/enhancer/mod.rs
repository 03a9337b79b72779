//! Display-name backfill for quote rows with degraded names.
//!
//! Eastmoney batches occasionally echo the instrument code where the
//! localized name should be. After the fallback chain resolves, the
//! enhancer scans the result set and repairs those rows through the Sina
//! suggestion endpoint, one concurrent lookup per degraded row. Lookup
//! failures are logged and the row keeps its original name.

mod suggest;

pub use suggest::{NameLookup, SuggestClient};

use futures::future::join_all;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::sync::Arc;

use crate::models::QuoteSet;
use crate::symbol::numeric_part;

lazy_static! {
    static ref LEADING_DIGITS_RE: Regex = Regex::new(r"^\d{6}").unwrap();
}

/// Post-aggregation name repair over a [`QuoteSet`].
pub struct NameEnhancer {
    lookup: Arc<dyn NameLookup>,
}

impl NameEnhancer {
    pub fn new() -> Self {
        Self {
            lookup: Arc::new(SuggestClient::new()),
        }
    }

    /// Build an enhancer over a custom lookup backend.
    pub fn with_lookup(lookup: Arc<dyn NameLookup>) -> Self {
        Self { lookup }
    }

    /// Whether a row's name is degraded and worth a lookup: empty, equal
    /// to its own code, or starting with a 6-digit run (a code leaked
    /// into the name field).
    fn needs_enhancement(code: &str, name: &str) -> bool {
        name.is_empty() || name == code || LEADING_DIGITS_RE.is_match(name)
    }

    /// Repair degraded names in place.
    ///
    /// Lookups for distinct rows run concurrently; each one resolves or
    /// fails independently and a failure never blocks the others or the
    /// caller.
    pub async fn enhance(&self, quotes: &mut QuoteSet) {
        let pending: Vec<String> = quotes
            .iter()
            .filter(|(code, quote)| Self::needs_enhancement(code, &quote.name))
            .map(|(code, _)| code.clone())
            .collect();

        if pending.is_empty() {
            return;
        }
        debug!("Enhancing names for {} quotes", pending.len());

        let lookups = pending.iter().map(|code| {
            let lookup = Arc::clone(&self.lookup);
            let numeric = numeric_part(code).to_string();
            async move { lookup.lookup_name(&numeric).await }
        });
        let results = join_all(lookups).await;

        for (code, result) in pending.iter().zip(results) {
            match result {
                Ok(Some(name)) if !name.is_empty() => {
                    if let Some(quote) = quotes.get_mut(code) {
                        quote.name = name;
                    }
                }
                Ok(_) => {
                    debug!("No suggestion name for {}", code);
                }
                Err(e) => {
                    warn!("Name lookup failed for {}: {}", code, e);
                }
            }
        }
    }
}

impl Default for NameEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::QuoteError;
    use crate::models::Quote;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockLookup {
        names: HashMap<String, String>,
        fail_codes: Vec<String>,
        call_count: AtomicUsize,
    }

    impl MockLookup {
        fn new(names: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                names: names
                    .iter()
                    .map(|(c, n)| (c.to_string(), n.to_string()))
                    .collect(),
                fail_codes: Vec::new(),
                call_count: AtomicUsize::new(0),
            })
        }

        fn failing(codes: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                names: HashMap::new(),
                fail_codes: codes.iter().map(|c| c.to_string()).collect(),
                call_count: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NameLookup for MockLookup {
        async fn lookup_name(&self, numeric_code: &str) -> Result<Option<String>, QuoteError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.fail_codes.iter().any(|c| c == numeric_code) {
                return Err(QuoteError::ProviderError {
                    provider: "SUGGEST".to_string(),
                    message: "mock failure".to_string(),
                });
            }
            Ok(self.names.get(numeric_code).cloned())
        }
    }

    fn quote(name: &str) -> Quote {
        Quote {
            name: name.to_string(),
            price: 1705.0,
            change: 15.0,
            change_percent: 0.89,
            volume: None,
            turnover: None,
        }
    }

    #[test]
    fn test_needs_enhancement() {
        assert!(NameEnhancer::needs_enhancement("sh600519", ""));
        assert!(NameEnhancer::needs_enhancement("sh600519", "sh600519"));
        assert!(NameEnhancer::needs_enhancement("sh600519", "600519"));
        assert!(NameEnhancer::needs_enhancement("sh600519", "600519茅台"));
        assert!(!NameEnhancer::needs_enhancement("sh600519", "贵州茅台"));
        assert!(!NameEnhancer::needs_enhancement("sh600519", "N/A 600519"));
    }

    #[tokio::test]
    async fn test_degraded_names_are_repaired() {
        let lookup = MockLookup::new(&[("600519", "贵州茅台")]);
        let enhancer = NameEnhancer::with_lookup(lookup.clone());

        let mut quotes = QuoteSet::new();
        quotes.insert("sh600519".to_string(), quote("600519"));
        quotes.insert("sz000858".to_string(), quote("五粮液"));

        enhancer.enhance(&mut quotes).await;

        assert_eq!(quotes["sh600519"].name, "贵州茅台");
        assert_eq!(quotes["sz000858"].name, "五粮液");
        // Only the degraded row triggered a lookup.
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_healthy_set_makes_no_lookups() {
        let lookup = MockLookup::new(&[]);
        let enhancer = NameEnhancer::with_lookup(lookup.clone());

        let mut quotes = QuoteSet::new();
        quotes.insert("sh600519".to_string(), quote("贵州茅台"));

        enhancer.enhance(&mut quotes).await;

        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_original_name() {
        let lookup = MockLookup::failing(&["600519"]);
        let enhancer = NameEnhancer::with_lookup(lookup);

        let mut quotes = QuoteSet::new();
        quotes.insert("sh600519".to_string(), quote("600519"));

        enhancer.enhance(&mut quotes).await;

        assert_eq!(quotes["sh600519"].name, "600519");
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_others() {
        let lookup = Arc::new(MockLookup {
            names: [("000858".to_string(), "五粮液".to_string())]
                .into_iter()
                .collect(),
            fail_codes: vec!["600519".to_string()],
            call_count: AtomicUsize::new(0),
        });
        let enhancer = NameEnhancer::with_lookup(lookup);

        let mut quotes = QuoteSet::new();
        quotes.insert("sh600519".to_string(), quote("600519"));
        quotes.insert("sz000858".to_string(), quote("000858"));

        enhancer.enhance(&mut quotes).await;

        assert_eq!(quotes["sh600519"].name, "600519");
        assert_eq!(quotes["sz000858"].name, "五粮液");
    }

    #[tokio::test]
    async fn test_empty_lookup_result_keeps_original_name() {
        let lookup = MockLookup::new(&[]);
        let enhancer = NameEnhancer::with_lookup(lookup);

        let mut quotes = QuoteSet::new();
        quotes.insert("sh600519".to_string(), quote("600519"));

        enhancer.enhance(&mut quotes).await;

        assert_eq!(quotes["sh600519"].name, "600519");
    }
}
