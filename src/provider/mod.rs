//! External geocoding provider interface.

mod nominatim;
pub use nominatim::NominatimProvider;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// One candidate row from a provider search response. Coordinates arrive as
/// strings and are parsed downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

/// Discrete fields for a structured search. The target country is fixed by
/// the provider instance and is not part of the query.
#[derive(Debug, Clone, Default)]
pub struct StructuredQuery {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Failure of a single provider request.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// A geocoding search backend. Implementations return an empty list for
/// "no match"; errors are reserved for transport and provider faults.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Free-text search, biased to the configured country.
    async fn search_free(&self, query: &str) -> Result<Vec<Candidate>, ProviderError>;

    /// Structured search with discrete street/city/state fields.
    async fn search_structured(
        &self,
        parts: &StructuredQuery,
    ) -> Result<Vec<Candidate>, ProviderError>;
}
