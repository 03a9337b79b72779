//! Sequential fallback chain across quote providers.
//!
//! Providers are tried strictly in registration order and the first
//! non-empty result set wins; later providers are never invoked for that
//! cycle. The ordering is a politeness trade-off: it minimizes unnecessary
//! external calls at the cost of worst-case latency, so the attempts are
//! deliberately never concurrent.

use log::{debug, warn};
use std::sync::Arc;

use crate::errors::QuoteError;
use crate::models::QuoteSet;
use crate::provider::{EastmoneyProvider, QuoteProvider, SinaProvider, TencentProvider};
use crate::symbol::normalize;

/// Ordered fallback chain over [`QuoteProvider`]s.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn QuoteProvider>>,
}

impl ProviderRegistry {
    /// Create a registry over an explicit provider chain, tried in order.
    pub fn new(providers: Vec<Arc<dyn QuoteProvider>>) -> Self {
        Self { providers }
    }

    /// The production chain: Eastmoney first (fastest and most complete
    /// for numeric-code batches), then Sina and Tencent, whose localized
    /// names are more reliable but whose endpoints are slower and less
    /// resilient to outages.
    pub fn with_default_providers() -> Self {
        Self::new(vec![
            Arc::new(EastmoneyProvider::new()),
            Arc::new(SinaProvider::new()),
            Arc::new(TencentProvider::new()),
        ])
    }

    /// The registered providers, in attempt order.
    pub fn providers(&self) -> &[Arc<dyn QuoteProvider>] {
        &self.providers
    }

    /// Fetch quotes for a batch of raw codes through the fallback chain.
    ///
    /// Input codes are normalized before the first attempt. A provider
    /// error is logged and treated as that provider yielding nothing; the
    /// chain always completes with a (possibly empty) result set, except
    /// when every provider failed hard, which surfaces once as
    /// [`QuoteError::AllProvidersFailed`].
    pub async fn fetch_aggregated(&self, raw_codes: &[String]) -> Result<QuoteSet, QuoteError> {
        let codes: Vec<String> = raw_codes.iter().map(|c| normalize(c)).collect();

        let mut hard_failures = 0;
        for provider in &self.providers {
            match provider.fetch_quotes(&codes).await {
                Ok(quotes) if !quotes.is_empty() => {
                    debug!(
                        "Provider '{}' returned {} quotes",
                        provider.id(),
                        quotes.len()
                    );
                    return Ok(quotes);
                }
                Ok(_) => {
                    debug!(
                        "Provider '{}' returned no quotes, trying next",
                        provider.id()
                    );
                }
                Err(e) => {
                    warn!("Provider '{}' failed: {}, trying next", provider.id(), e);
                    hard_failures += 1;
                }
            }
        }

        if !self.providers.is_empty() && hard_failures == self.providers.len() {
            Err(QuoteError::AllProvidersFailed)
        } else {
            Ok(QuoteSet::new())
        }
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_default_providers()
    }
}
