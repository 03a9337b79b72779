//! Top-level quote service.
//!
//! One call runs the whole pipeline: normalize the requested codes, fetch
//! through the provider fallback chain, then backfill degraded names.

use crate::enhancer::NameEnhancer;
use crate::errors::QuoteError;
use crate::models::QuoteSet;
use crate::registry::ProviderRegistry;

/// Facade over the fallback chain and the name enhancer.
pub struct QuoteService {
    registry: ProviderRegistry,
    enhancer: NameEnhancer,
}

impl QuoteService {
    /// Service over the production provider chain and suggestion backend.
    pub fn new() -> Self {
        Self {
            registry: ProviderRegistry::with_default_providers(),
            enhancer: NameEnhancer::new(),
        }
    }

    /// Service over explicit components, for alternate chains and tests.
    pub fn with_components(registry: ProviderRegistry, enhancer: NameEnhancer) -> Self {
        Self { registry, enhancer }
    }

    /// Fetch quotes for the requested codes.
    ///
    /// Codes may be bare 6-digit or market-prefixed; result keys are
    /// always canonical prefixed codes. Codes no provider knows are
    /// simply absent from the result.
    pub async fn get_quotes<S: AsRef<str>>(&self, raw_codes: &[S]) -> Result<QuoteSet, QuoteError> {
        let codes: Vec<String> = raw_codes.iter().map(|c| c.as_ref().to_string()).collect();

        let mut quotes = self.registry.fetch_aggregated(&codes).await?;
        self.enhancer.enhance(&mut quotes).await;

        Ok(quotes)
    }
}

impl Default for QuoteService {
    fn default() -> Self {
        Self::new()
    }
}
