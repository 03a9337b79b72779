//! Tencent quote provider.
//!
//! The secondary text provider, queried only when Eastmoney and Sina both
//! yield nothing. Lines are `v_<CODE>="..."` statements with tilde-separated
//! positional fields, and the body is almost always GBK-encoded.

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

use crate::errors::QuoteError;
use crate::models::{Quote, QuoteSet};
use crate::provider::encoding::{decode_text, DecodeOrder};
use crate::provider::headers::tencent_headers;
use crate::provider::QuoteProvider;

const BASE_URL: &str = "https://qt.gtimg.cn/q=";
const PROVIDER_ID: &str = "TENCENT";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// A line is accepted only with more than this many tilde-separated fields.
const MIN_FIELDS: usize = 50;

lazy_static! {
    static ref LINE_RE: Regex = Regex::new(r#"v_([^=]+)="([^"]*)""#).unwrap();
}

/// Tencent batched quote provider.
pub struct TencentProvider {
    client: Client,
}

impl TencentProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .default_headers(tencent_headers())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Parse the line-oriented response body.
    ///
    /// Field layout: 1=name, 2=bare code, 3=current price, 4=previous
    /// close, 5=open, 6=volume, ..., 37=turnover. Change and percent are
    /// derived the same way as for Sina.
    fn parse_response(text: &str) -> QuoteSet {
        let mut quotes = QuoteSet::new();

        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let Some(caps) = LINE_RE.captures(line) else {
                continue;
            };
            let code = &caps[1];
            let fields: Vec<&str> = caps[2].split('~').collect();

            if fields.len() <= MIN_FIELDS {
                warn!(
                    "Tencent: skipping {} with only {} fields",
                    code,
                    fields.len()
                );
                continue;
            }

            let name = fields[1].to_string();
            let price: f64 = fields[3].parse().unwrap_or(0.0);
            let prev_close: f64 = fields[4].parse().unwrap_or(0.0);
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
                volume: Some(opaque_or_zero(fields[6])),
                turnover: Some(opaque_or_zero(fields[37])),
            };

            if quote.is_valid() {
                quotes.insert(code.to_string(), quote);
            } else {
                warn!(
                    "Tencent: dropping invalid record for {} (name={:?}, price={})",
                    code, quote.name, quote.price
                );
            }
        }

        quotes
    }
}

fn opaque_or_zero(field: &str) -> String {
    if field.is_empty() {
        "0".to_string()
    } else {
        field.to_string()
    }
}

impl Default for TencentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for TencentProvider {
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
        let text = decode_text(&bytes, DecodeOrder::GbkFirst);
        let quotes = Self::parse_response(&text);
        debug!(
            "Tencent: parsed {} of {} requested codes",
            quotes.len(),
            codes.len()
        );
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_line(code: &str, name: &str, price: &str, prev_close: &str) -> String {
        let mut fields = vec!["0".to_string(); 55];
        fields[1] = name.to_string();
        fields[2] = code.trim_start_matches(['s', 'h', 'z']).to_string();
        fields[3] = price.to_string();
        fields[4] = prev_close.to_string();
        fields[6] = "28764".to_string();
        fields[37] = "489322".to_string();
        format!("v_{}=\"{}\";", code, fields.join("~"))
    }

    #[test]
    fn test_parse_valid_line() {
        let text = fixture_line("sh600519", "贵州茅台", "1705.00", "1690.00");
        let quotes = TencentProvider::parse_response(&text);

        let quote = &quotes["sh600519"];
        assert_eq!(quote.name, "贵州茅台");
        assert_eq!(quote.price, 1705.00);
        assert!((quote.change - 15.00).abs() < 1e-9);
        assert!((quote.change_percent - 0.8876).abs() < 1e-3);
        assert_eq!(quote.volume.as_deref(), Some("28764"));
        assert_eq!(quote.turnover.as_deref(), Some("489322"));
    }

    #[test]
    fn test_too_few_fields_silently_skipped() {
        // Exactly 50 fields: at the threshold, still rejected.
        let fields = vec!["0"; 50].join("~");
        let text = format!("v_sh600519=\"{}\";", fields);
        assert!(TencentProvider::parse_response(&text).is_empty());
    }

    #[test]
    fn test_zero_price_dropped() {
        let text = fixture_line("sh600519", "贵州茅台", "0", "1690.00");
        assert!(TencentProvider::parse_response(&text).is_empty());
    }

    #[test]
    fn test_empty_name_dropped() {
        let text = fixture_line("sh600519", "", "1705.00", "1690.00");
        assert!(TencentProvider::parse_response(&text).is_empty());
    }

    #[test]
    fn test_mixed_batch_keeps_good_lines() {
        let text = format!(
            "{}\nv_pv_none=\"1\";\n{}",
            fixture_line("sh600519", "贵州茅台", "1705.00", "1690.00"),
            fixture_line("sz000858", "五粮液", "128.50", "130.06"),
        );
        let quotes = TencentProvider::parse_response(&text);
        assert_eq!(quotes.len(), 2);
    }

    #[test]
    fn test_provider_id() {
        assert_eq!(TencentProvider::new().id(), "TENCENT");
    }
}
