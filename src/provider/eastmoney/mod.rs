//! Eastmoney quote provider.
//!
//! The fast, structured provider: one batched GET against the `ulist.np`
//! endpoint returns a JSON document with an array of per-code records.
//! Codes are addressed in "market-digit.number" secid form; the response
//! carries bare numeric codes which are re-keyed back into canonical form
//! with the digit-prefix rule.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::QuoteError;
use crate::models::{Quote, QuoteSet};
use crate::provider::headers::eastmoney_headers;
use crate::provider::QuoteProvider;
use crate::symbol::{eastmoney_secid, normalize};

const BASE_URL: &str = "https://push2.eastmoney.com/api/qt/ulist.np/get";
/// f2=price, f3=change percent, f4=change, f12=bare code, f14=name.
const FIELDS: &str = "f2,f3,f4,f12,f14";
const PROVIDER_ID: &str = "EASTMONEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Eastmoney batched quote provider.
pub struct EastmoneyProvider {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct UlistResponse {
    data: Option<UlistData>,
}

#[derive(Debug, Deserialize)]
struct UlistData {
    #[serde(default)]
    diff: Vec<DiffRecord>,
}

/// One record of the `data.diff` array. Numeric fields arrive as JSON
/// numbers normally but as the string `"-"` for suspended instruments,
/// so they are captured as raw values and read tolerantly.
#[derive(Debug, Deserialize)]
struct DiffRecord {
    #[serde(default)]
    f2: serde_json::Value,
    #[serde(default)]
    f3: serde_json::Value,
    #[serde(default)]
    f4: serde_json::Value,
    #[serde(default)]
    f12: String,
    #[serde(default)]
    f14: String,
}

fn num(value: &serde_json::Value) -> f64 {
    value.as_f64().unwrap_or(0.0)
}

impl EastmoneyProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .default_headers(eastmoney_headers())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Parse the ulist JSON document into a result set keyed by canonical code.
    fn parse_response(text: &str) -> Result<QuoteSet, QuoteError> {
        let response: UlistResponse =
            serde_json::from_str(text).map_err(|e| QuoteError::ParseError(format!(
                "Eastmoney: failed to parse response: {}",
                e
            )))?;

        let mut quotes = QuoteSet::new();
        let Some(data) = response.data else {
            return Ok(quotes);
        };

        for record in &data.diff {
            let code = record.f12.as_str();
            if code.is_empty() {
                continue;
            }
            let canonical = normalize(code);

            let name = if record.f14.is_empty() {
                code.to_string()
            } else {
                record.f14.clone()
            };

            let quote = Quote {
                name,
                price: num(&record.f2),
                change: num(&record.f4),
                change_percent: num(&record.f3),
                volume: None,
                turnover: None,
            };

            if quote.is_valid() {
                quotes.insert(canonical, quote);
            } else {
                warn!(
                    "Eastmoney: dropping invalid record for {} (name={:?}, price={})",
                    canonical, quote.name, quote.price
                );
            }
        }

        Ok(quotes)
    }
}

impl Default for EastmoneyProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for EastmoneyProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quotes(&self, codes: &[String]) -> Result<QuoteSet, QuoteError> {
        let secids = codes
            .iter()
            .map(|c| eastmoney_secid(c))
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}?fltt=2&fields={}&secids={}", BASE_URL, FIELDS, secids);

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

        let text = response.text().await?;
        let quotes = Self::parse_response(&text)?;
        debug!(
            "Eastmoney: parsed {} of {} requested codes",
            quotes.len(),
            codes.len()
        );
        Ok(quotes)
    }
}
