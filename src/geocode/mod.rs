//! Reverse geocoding: map point to city/state/country.
//!
//! Enrichment is best effort. Every failure becomes empty metadata and is only
//! logged; callers never see an error and nothing is retried.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{LatLng, LocationMetadata};

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Resolve a point. Never fails; see [`LocationMetadata::empty`].
    async fn reverse_geocode(&self, position: LatLng) -> LocationMetadata;
}

#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl From<Address> for LocationMetadata {
    fn from(address: Address) -> Self {
        let city = [address.city, address.town, address.village]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .unwrap_or_default();

        LocationMetadata {
            city,
            state: address.state.unwrap_or_default(),
            country: address.country.unwrap_or_default(),
        }
    }
}

/// Nominatim-compatible reverse geocoding client.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: Client,
    endpoint: Url,
}

impl NominatimClient {
    /// `http` should carry the configured timeout and user agent.
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    async fn lookup(&self, position: LatLng) -> Result<LocationMetadata, AppError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("lat", position.lat.to_string()),
                ("lon", position.lng.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_response(status.as_u16(), &body));
        }

        let body: ReverseResponse = response.json().await?;
        Ok(body.address.map(LocationMetadata::from).unwrap_or_default())
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse_geocode(&self, position: LatLng) -> LocationMetadata {
        match self.lookup(position).await {
            Ok(metadata) => {
                tracing::debug!(
                    "Reverse geocoded ({}, {}) to {:?}",
                    position.lat,
                    position.lng,
                    metadata
                );
                metadata
            }
            Err(e) => {
                tracing::warn!(
                    "Reverse geocode failed for ({}, {}): {}",
                    position.lat,
                    position.lng,
                    e
                );
                LocationMetadata::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> LocationMetadata {
        let response: ReverseResponse = serde_json::from_value(json).unwrap();
        response.address.map(LocationMetadata::from).unwrap_or_default()
    }

    #[test]
    fn test_city_falls_back_to_town_then_village() {
        let metadata = parse(serde_json::json!({
            "address": {"town": "Concord", "village": "Nine Acre Corner", "state": "MA"}
        }));
        assert_eq!(metadata, LocationMetadata::new("Concord", "MA", ""));

        let metadata = parse(serde_json::json!({
            "address": {"city": "", "village": "Nine Acre Corner", "country": "US"}
        }));
        assert_eq!(metadata, LocationMetadata::new("Nine Acre Corner", "", "US"));
    }

    #[test]
    fn test_missing_address_is_empty() {
        assert!(parse(serde_json::json!({"error": "Unable to geocode"})).is_empty());
        assert!(parse(serde_json::json!({"address": null})).is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service_yields_empty_metadata() {
        let http = Client::builder()
            .timeout(std::time::Duration::from_millis(500))
            .build()
            .unwrap();
        // Port 9 (discard) on localhost is not expected to speak HTTP.
        let client = NominatimClient::new(http, Url::parse("http://127.0.0.1:9/reverse").unwrap());

        let metadata = client.reverse_geocode(LatLng::new(42.3601, -71.0589)).await;
        assert_eq!(metadata, LocationMetadata::empty());
    }
}
