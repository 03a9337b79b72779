//! Sina quote provider.
//!
//! The primary text provider: one batched GET with a comma-joined code
//! list. The response is line-oriented, one `var hq_str_<CODE>="..."`
//! statement per code, with comma-separated positional fields inside the
//! quotes. Names here are the most reliable of the three providers.

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

use crate::errors::QuoteError;
use crate::models::{Quote, QuoteSet};
use crate::provider::encoding::{decode_text, DecodeOrder};
use crate::provider::headers::sina_headers;
use crate::provider::QuoteProvider;

const BASE_URL: &str = "https://hq.sinajs.cn/list=";
const PROVIDER_ID: &str = "SINA";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// A line is accepted only with at least this many comma-separated fields.
/// Shorter payloads are error stubs ("FAILED", empty string) or truncated
/// responses.
const MIN_FIELDS: usize = 32;

lazy_static! {
    static ref LINE_RE: Regex = Regex::new(r#"var hq_str_([^=]+)="([^"]*)""#).unwrap();
}

/// Sina batched quote provider.
pub struct SinaProvider {
    client: Client,
}

impl SinaProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .default_headers(sina_headers())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Parse the line-oriented response body.
    ///
    /// Field layout: 0=name, 1=open, 2=previous close, 3=current price,
    /// 4=high, 5=low, ..., 8=volume, 9=turnover. Change and percent are
    /// derived from price and previous close; the provider does not send
    /// them directly.
    fn parse_response(text: &str) -> QuoteSet {
        let mut quotes = QuoteSet::new();

        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let Some(caps) = LINE_RE.captures(line) else {
                warn!("Sina: unmatched line: {:.100}", line);
                continue;
            };
            let code = &caps[1];
            let fields: Vec<&str> = caps[2].split(',').collect();

            if fields.len() < MIN_FIELDS {
                warn!(
                    "Sina: skipping {} with only {} fields",
                    code,
                    fields.len()
                );
                continue;
            }

            let name = fields[0].trim().to_string();
            let prev_close: f64 = fields[2].parse().unwrap_or(0.0);
            let price: f64 = fields[3].parse().unwrap_or(0.0);
            let change = price - prev_close;
            let change_percent = if prev_close > 0.0 {
                change / prev_close * 100.0
            } else {
                0.0
            };

            let quote = Quote {
                name,
                price,
                change,
                change_percent,
                volume: Some(opaque_or_zero(fields[8])),
                turnover: Some(opaque_or_zero(fields[9])),
            };

            if quote.is_valid() {
                quotes.insert(code.to_string(), quote);
            } else {
                warn!(
                    "Sina: dropping invalid record for {} (name={:?}, price={})",
                    code, quote.name, quote.price
                );
            }
        }

        quotes
    }
}

/// Volume and turnover are provider-dependent opaque strings; an absent
/// field becomes "0" rather than an empty string.
fn opaque_or_zero(field: &str) -> String {
    if field.is_empty() {
        "0".to_string()
    } else {
        field.to_string()
    }
}

impl Default for SinaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for SinaProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quotes(&self, codes: &[String]) -> Result<QuoteSet, QuoteError> {
        let url = format!("{}{}", BASE_URL, codes.join(","));

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                QuoteError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                QuoteError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let bytes = response.bytes().await?;
        let text = decode_text(&bytes, DecodeOrder::Utf8First);
        let quotes = Self::parse_response(&text);
        debug!(
            "Sina: parsed {} of {} requested codes",
            quotes.len(),
            codes.len()
        );
        Ok(quotes)
    }
}
