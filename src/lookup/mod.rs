mod address;
mod insight;

pub use address::{
    AddressLookup, IbgeLocalidades, Region, RegionLookup, ResolvedAddress, ViaCep,
};
pub use insight::{GeminiInsights, InsightProvider, INSIGHT_FALLBACK};

use thiserror::Error;

/// Failures from the external read-only lookups. Callers degrade
/// gracefully: address fields stay unchanged, the AI commentary falls back
/// to a fixed message. Nothing here is retried.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unexpected response shape: {0}")]
    Malformed(String),
}
