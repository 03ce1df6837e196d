//! Narra - address resolution for Philippine postal addresses
//!
//! This library normalizes free-text addresses, resolves them to coordinates
//! through an external geocoding provider with rate limiting and a retry
//! ladder, and caches results for the process lifetime.

pub mod config;
pub mod normalize;
pub mod provider;
pub mod rate_limit;
pub mod resolver;

pub use normalize::normalize_address;
pub use rate_limit::RateLimiter;
pub use resolver::{AddressResolver, BoundingBox, FailureReason, GeocodingResult, ResolveOutcome};
