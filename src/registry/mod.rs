//! Fallback orchestration across providers.

mod provider_registry;

pub use provider_registry::ProviderRegistry;
