//! Sina suggestion-search client used for name backfill.
//!
//! The endpoint is the same one Sina's own search box calls: a single GET
//! keyed by the bare numeric code, answering with a `="..."` payload of
//! semicolon-separated candidates, each a comma-separated record.

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

use crate::errors::QuoteError;
use crate::provider::encoding::{decode_text, DecodeOrder};
use crate::provider::headers::suggest_headers;

const BASE_URL: &str = "https://suggest3.sinajs.cn/suggest/type=11,12,13,14,15&key=";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// A candidate record needs at least this many comma-separated parts to
/// carry both its code (index 3) and display name (index 4).
const MIN_PARTS: usize = 5;

lazy_static! {
    static ref PAYLOAD_RE: Regex = Regex::new(r#"="([^"]*)""#).unwrap();
}

/// Single-code name lookup, the seam the enhancer fans out over.
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Resolve a display name for a bare numeric code. `Ok(None)` means
    /// the upstream answered but had no matching candidate.
    async fn lookup_name(&self, numeric_code: &str) -> Result<Option<String>, QuoteError>;
}

/// Production [`NameLookup`] backed by the Sina suggestion endpoint.
pub struct SuggestClient {
    client: Client,
}

impl SuggestClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .default_headers(suggest_headers())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Pick a display name out of the suggestion payload.
    ///
    /// Candidates are scanned in response order and the first whose code
    /// matches the query (substring in either direction, so "600519"
    /// matches both "600519" and "sh600519" records) wins.
    fn parse_response(text: &str, numeric_code: &str) -> Option<String> {
        let payload = PAYLOAD_RE.captures(text)?.get(1)?.as_str();

        for candidate in payload.split(';') {
            let parts: Vec<&str> = candidate.split(',').collect();
            if parts.len() < MIN_PARTS {
                continue;
            }
            let code = parts[3].trim();
            let name = parts[4].trim();
            if code.is_empty() || name.is_empty() {
                continue;
            }
            if code.contains(numeric_code) || numeric_code.contains(code) {
                return Some(name.to_string());
            }
        }

        None
    }
}

impl Default for SuggestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameLookup for SuggestClient {
    async fn lookup_name(&self, numeric_code: &str) -> Result<Option<String>, QuoteError> {
        let url = format!("{}{}", BASE_URL, numeric_code);
        debug!("Suggest lookup for {}", numeric_code);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                QuoteError::Timeout {
                    provider: "SUGGEST".to_string(),
                }
            } else {
                QuoteError::Network(e)
            }
        })?;

        let bytes = response.bytes().await?;
        let text = decode_text(&bytes, DecodeOrder::Utf8First);

        Ok(Self::parse_response(&text, numeric_code))
    }
}
