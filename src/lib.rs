//! Multi-provider quote aggregation for China A-share instruments.
//!
//! Three upstream providers are tried in a strict fallback order —
//! Eastmoney (JSON), then Sina and Tencent (line-oriented text) — and the
//! first non-empty batch wins. Results are keyed by canonical
//! market-prefixed codes, and rows whose localized name came back
//! degraded are repaired through Sina's suggestion search.
//!
//! [`QuoteService`] is the entry point:
//!
//! ```no_run
//! use ashare_quotes::QuoteService;
//!
//! # async fn run() -> Result<(), ashare_quotes::QuoteError> {
//! let service = QuoteService::new();
//! let quotes = service.get_quotes(&["600519", "sz000858"]).await?;
//! for (code, quote) in &quotes {
//!     println!("{} {} {:.2}", code, quote.name, quote.price);
//! }
//! # Ok(())
//! # }
//! ```

pub mod enhancer;
pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;
mod service;
pub mod symbol;

pub use enhancer::{NameEnhancer, NameLookup, SuggestClient};
pub use errors::QuoteError;
pub use models::{Quote, QuoteSet, UNAVAILABLE_MARKER};
pub use provider::{EastmoneyProvider, QuoteProvider, SinaProvider, TencentProvider};
pub use registry::ProviderRegistry;
pub use service::QuoteService;
pub use symbol::normalize;
