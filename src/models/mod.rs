//! Data model for normalized quotes.

mod quote;

pub use quote::{Quote, QuoteSet, UNAVAILABLE_MARKER};
