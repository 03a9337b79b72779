//! Quote provider trait definition.

use async_trait::async_trait;

use crate::errors::QuoteError;
use crate::models::QuoteSet;

/// Trait for batched quote providers.
///
/// Each implementation knows one wire format and one endpoint shape.
/// Providers never panic past their own boundary: an unusable response
/// comes back as an empty [`QuoteSet`] (every line failed parsing or
/// validity) or as a [`QuoteError`] the registry treats as "try the next
/// provider".
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider, used for logging.
    fn id(&self) -> &'static str;

    /// Fetch quotes for a batch of canonical codes in a single request.
    ///
    /// Keys of the returned set are canonical codes. Records that fail
    /// parsing or validity are silently dropped, never fatal to the batch.
    async fn fetch_quotes(&self, codes: &[String]) -> Result<QuoteSet, QuoteError>;
}
