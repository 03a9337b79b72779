//! Error types for quote aggregation.
//!
//! Most failures are recovered locally: a provider error makes the fallback
//! chain move on to the next provider, a malformed line is skipped by the
//! parser that saw it. Only [`QuoteError::AllProvidersFailed`] reaches the
//! caller of the facade, and only when every provider in the chain failed
//! with a hard transport error.

use thiserror::Error;

/// Errors that can occur while fetching and aggregating quotes.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred (non-success status, bad payload).
    /// The registry treats this as "try the next provider".
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A response body could not be parsed into the expected shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Every provider in the chain failed with a hard transport error.
    /// This is the only error surfaced to the facade's caller.
    #[error("All providers failed")]
    AllProvidersFailed,

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
