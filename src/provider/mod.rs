//! Provider clients for the upstream quote endpoints.
//!
//! The three providers share one contract ([`QuoteProvider`]) and differ
//! only in wire format: endpoint shape, field-count threshold, field-index
//! layout, timeout, and preferred decode order live in each provider
//! module, not in control flow.

pub mod eastmoney;
pub mod encoding;
pub mod headers;
pub mod sina;
pub mod tencent;
mod traits;

pub use eastmoney::EastmoneyProvider;
pub use sina::SinaProvider;
pub use tencent::TencentProvider;
pub use traits::QuoteProvider;
