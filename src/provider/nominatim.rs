//! Nominatim-style search endpoint client.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{Candidate, ProviderError, SearchProvider, StructuredQuery};

/// Client for a Nominatim-compatible `/search` endpoint.
pub struct NominatimProvider {
    client: Client,
    base_url: String,
    country_code: String,
    country_name: String,
}

impl NominatimProvider {
    /// `user_agent` identifies this client to the provider, as its usage
    /// policy requires. `timeout` applies per request.
    pub fn new(
        base_url: &str,
        country_code: &str,
        country_name: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .user_agent(user_agent)
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            country_code: country_code.to_string(),
            country_name: country_name.to_string(),
        }
    }

    async fn execute(&self, params: &[(&str, String)]) -> Result<Vec<Candidate>, ProviderError> {
        let url = format!("{}/search", self.base_url);
        debug!("Querying {} with {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        response.json::<Vec<Candidate>>().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Malformed(e.to_string())
            }
        })
    }
}

fn classify_transport(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(error.to_string())
    }
}

#[async_trait]
impl SearchProvider for NominatimProvider {
    async fn search_free(&self, query: &str) -> Result<Vec<Candidate>, ProviderError> {
        let params = [
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
            ("countrycodes", self.country_code.clone()),
            ("addressdetails", "1".to_string()),
        ];
        self.execute(&params).await
    }

    async fn search_structured(
        &self,
        parts: &StructuredQuery,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let mut params = vec![
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
            ("addressdetails", "1".to_string()),
            ("country", self.country_name.clone()),
        ];
        if let Some(street) = &parts.street {
            params.push(("street", street.clone()));
        }
        if let Some(city) = &parts.city {
            params.push(("city", city.clone()));
        }
        if let Some(state) = &parts.state {
            params.push(("state", state.clone()));
        }
        self.execute(&params).await
    }
}
