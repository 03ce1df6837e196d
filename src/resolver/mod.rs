//! Address resolution: normalization, cache, rate-limited retry ladder,
//! and plausibility checks.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::normalize::normalize_address;
use crate::provider::{Candidate, ProviderError, SearchProvider, StructuredQuery};
use crate::rate_limit::RateLimiter;

/// A resolved coordinate pair with the provider's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingResult {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

/// Why a resolution yielded no result. Carried so callers and tests can
/// distinguish causes without matching log strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Every strategy ran and none matched.
    NoMatch,
    Timeout,
    Network,
    /// Provider fault: bad status or a response we could not use.
    Provider,
}

impl From<&ProviderError> for FailureReason {
    fn from(error: &ProviderError) -> Self {
        match error {
            ProviderError::Timeout => FailureReason::Timeout,
            ProviderError::Network(_) => FailureReason::Network,
            ProviderError::Status(_) | ProviderError::Malformed(_) => FailureReason::Provider,
        }
    }
}

/// Outcome of a single resolution. Exhausting every strategy is a valid
/// negative outcome, not an error: this API never fails.
#[derive(Debug, Clone)]
pub enum ResolveOutcome {
    Found(GeocodingResult),
    NotFound(FailureReason),
}

impl ResolveOutcome {
    pub fn into_result(self) -> Option<GeocodingResult> {
        match self {
            ResolveOutcome::Found(result) => Some(result),
            ResolveOutcome::NotFound(_) => None,
        }
    }
}

/// Plausibility rectangle in signed decimal degrees. Fields left out when
/// deserializing fall back to the Philippine extent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Approximate extent of Philippine territory.
    pub const PHILIPPINES: BoundingBox = BoundingBox {
        south: 4.2,
        west: 114.0,
        north: 21.4,
        east: 127.6,
    };

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south && lat <= self.north && lng >= self.west && lng <= self.east
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::PHILIPPINES
    }
}

/// Ordered retry ladder. Each step issues one rate-limited provider request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    FreeText,
    CountrySuffix,
    Structured,
}

impl Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::FreeText => "free-text",
            Strategy::CountrySuffix => "country-suffix",
            Strategy::Structured => "structured",
        }
    }
}

/// Resolves free-text addresses to coordinates.
///
/// Owns all mutable state explicitly (cache, rate limiter), so independent
/// instances can coexist with independent limits. Safe to share behind an
/// `Arc` across concurrent callers.
pub struct AddressResolver<P: SearchProvider> {
    provider: P,
    rate_limiter: RateLimiter,
    cache: Mutex<HashMap<String, GeocodingResult>>,
    country_name: String,
    bounds: BoundingBox,
}

impl<P: SearchProvider> AddressResolver<P> {
    pub fn new(
        provider: P,
        rate_limiter: RateLimiter,
        country_name: &str,
        bounds: BoundingBox,
    ) -> Self {
        Self {
            provider,
            rate_limiter,
            cache: Mutex::new(HashMap::new()),
            country_name: country_name.to_string(),
            bounds,
        }
    }

    /// Resolve one address. Returns the coordinates or a reason for absence;
    /// never an error.
    pub async fn resolve(&self, address: &str) -> ResolveOutcome {
        let normalized = normalize_address(address);
        if normalized.is_empty() {
            return ResolveOutcome::NotFound(FailureReason::NoMatch);
        }

        if let Some(hit) = self.cache_get(&normalized) {
            debug!("Cache hit for '{}'", normalized);
            return ResolveOutcome::Found(hit);
        }

        let mut reason = FailureReason::NoMatch;
        for strategy in self.strategy_ladder(&normalized) {
            self.rate_limiter.await_slot().await;

            let attempt = match strategy {
                Strategy::FreeText => self.provider.search_free(&normalized).await,
                Strategy::CountrySuffix => {
                    let query = format!("{}, {}", normalized, self.country_name);
                    self.provider.search_free(&query).await
                }
                Strategy::Structured => {
                    self.provider
                        .search_structured(&structured_parts(&normalized))
                        .await
                }
            };

            match attempt {
                Ok(candidates) => match candidates.into_iter().next() {
                    Some(candidate) => match self.accept(&normalized, candidate) {
                        Some(result) => return ResolveOutcome::Found(result),
                        None => reason = FailureReason::Provider,
                    },
                    None => {
                        debug!(
                            "No {} match for '{}', falling through",
                            strategy.name(),
                            normalized
                        );
                        reason = FailureReason::NoMatch;
                    }
                },
                Err(error) => {
                    warn!(
                        "Geocoding {} attempt failed for '{}': {}",
                        strategy.name(),
                        normalized,
                        error
                    );
                    reason = FailureReason::from(&error);
                }
            }
        }

        debug!("All strategies exhausted for '{}'", normalized);
        ResolveOutcome::NotFound(reason)
    }

    /// Resolve one address, collapsing the failure reason to `None`.
    pub async fn geocode_address(&self, address: &str) -> Option<GeocodingResult> {
        self.resolve(address).await.into_result()
    }

    /// Resolve a batch strictly in order, one at a time. The output has the
    /// same length as the input, with `None` marking addresses that did not
    /// resolve. Sequential processing keeps the global rate limit honest
    /// without extra coordination.
    pub async fn geocode_addresses(&self, addresses: &[String]) -> Vec<Option<GeocodingResult>> {
        let mut results = Vec::with_capacity(addresses.len());
        for address in addresses {
            results.push(self.geocode_address(address).await);
        }
        results
    }

    /// Number of cached resolutions.
    pub fn cache_size(&self) -> usize {
        self.cache.lock().expect("cache mutex poisoned").len()
    }

    /// Drop every cached resolution. Entries otherwise live for the process
    /// lifetime; there is no eviction.
    pub fn clear_cache(&self) {
        self.cache.lock().expect("cache mutex poisoned").clear();
    }

    fn cache_get(&self, normalized: &str) -> Option<GeocodingResult> {
        self.cache
            .lock()
            .expect("cache mutex poisoned")
            .get(normalized)
            .cloned()
    }

    /// Skip the country-suffix step when the address already names the
    /// country.
    fn strategy_ladder(&self, normalized: &str) -> Vec<Strategy> {
        let mut ladder = vec![Strategy::FreeText];
        if !normalized
            .to_lowercase()
            .contains(&self.country_name.to_lowercase())
        {
            ladder.push(Strategy::CountrySuffix);
        }
        ladder.push(Strategy::Structured);
        ladder
    }

    /// Parse, sanity-check, cache, and return a candidate. An implausible
    /// location is logged but still accepted. `None` only when the
    /// coordinates do not parse.
    fn accept(&self, normalized: &str, candidate: Candidate) -> Option<GeocodingResult> {
        let (lat, lng) = match (candidate.lat.parse::<f64>(), candidate.lon.parse::<f64>()) {
            (Ok(lat), Ok(lng)) => (lat, lng),
            _ => {
                warn!(
                    "Unparseable coordinates '{}','{}' for '{}'",
                    candidate.lat, candidate.lon, normalized
                );
                return None;
            }
        };

        if !self.bounds.contains(lat, lng) {
            warn!(
                "Geocoded point {},{} for '{}' falls outside the expected bounding box",
                lat, lng, normalized
            );
        }

        let result = GeocodingResult {
            lat,
            lng,
            display_name: candidate.display_name,
        };
        self.cache
            .lock()
            .expect("cache mutex poisoned")
            .insert(normalized.to_string(), result.clone());
        Some(result)
    }
}

/// Map comma-separated components onto structured fields: first to street,
/// second to city, third to state. Extras are ignored.
fn structured_parts(normalized: &str) -> StructuredQuery {
    let mut parts = normalized.split(", ");
    StructuredQuery {
        street: parts.next().map(str::to_string),
        city: parts.next().map(str::to_string),
        state: parts.next().map(str::to_string),
    }
}
