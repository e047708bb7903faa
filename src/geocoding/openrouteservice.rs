use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::GeocodingProvider;
use crate::config::GeocodingConfig;
use crate::models::Coordinate;
use crate::{Result, RouteError};

/// OpenRouteService Pelias search client
pub struct OpenRouteServiceClient {
    client: Client,
    base_url: String,
}

/// GeoJSON search response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    /// GeoJSON order: `[longitude, latitude]`
    pub coordinates: Vec<f64>,
}

impl Feature {
    fn to_coordinate(&self) -> Result<Coordinate> {
        match self.geometry.coordinates.as_slice() {
            [longitude, latitude, ..] => Ok(Coordinate::new(*latitude, *longitude)),
            other => Err(RouteError::geocoding(format!(
                "Malformed feature geometry with {} coordinates",
                other.len()
            ))),
        }
    }
}

impl OpenRouteServiceClient {
    /// Create a new client
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("courier-route/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RouteError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, text: &str, credential: &str) -> String {
        format!(
            "{}/geocode/search?api_key={}&text={}",
            self.base_url,
            urlencoding::encode(credential),
            urlencoding::encode(text)
        )
    }
}

#[async_trait]
impl GeocodingProvider for OpenRouteServiceClient {
    #[instrument(skip(self, credential))]
    async fn search(&self, text: &str, credential: &str) -> Result<Vec<Coordinate>> {
        debug!("Calling the geocoding API");

        let response = self
            .client
            .get(self.search_url(text, credential))
            .send()
            .await
            .map_err(|e| RouteError::api(format!("Geocoding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return match status.as_u16() {
                401 | 403 => Err(RouteError::geocoding(
                    "Invalid or missing OpenRouteService API key",
                )),
                429 => Err(RouteError::geocoding(
                    "OpenRouteService rate limit exceeded",
                )),
                _ => Err(RouteError::api(format!(
                    "OpenRouteService error {status}: {error_text}"
                ))),
            };
        }

        let search_response: SearchResponse = response.json().await.map_err(|e| {
            RouteError::geocoding(format!("Failed to parse OpenRouteService response: {e}"))
        })?;

        let candidates: Vec<Coordinate> = search_response
            .features
            .iter()
            .filter_map(|feature| match feature.to_coordinate() {
                Ok(coordinate) => Some(coordinate),
                Err(e) => {
                    debug!("Skipping candidate: {}", e);
                    None
                }
            })
            .collect();

        info!("Found {} candidates for {}", candidates.len(), text);
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::{GeocodeStatus, LocationResolver};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenRouteServiceClient {
        let config = GeocodingConfig {
            api_key: None,
            base_url: server.uri(),
            timeout_seconds: 5,
        };
        OpenRouteServiceClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_search_swaps_geojson_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode/search"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("text", "Katraj, Pune"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "FeatureCollection",
                "features": [
                    { "geometry": { "type": "Point", "coordinates": [73.8580, 18.4575] } },
                    { "geometry": { "type": "Point", "coordinates": [73.0, 18.0] } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let candidates = client_for(&server)
            .search("Katraj, Pune", "test-key")
            .await
            .unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], Coordinate::new(18.4575, 73.8580));
    }

    #[tokio::test]
    async fn test_search_without_features() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": [] })))
            .mount(&server)
            .await;

        let candidates = client_for(&server).search("Nowhere", "k").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_search_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let result = client_for(&server).search("Katraj", "bad-key").await;
        assert!(matches!(result, Err(RouteError::Geocoding { .. })));
    }

    #[tokio::test]
    async fn test_search_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let result = client_for(&server).search("Katraj", "k").await;
        let err = result.unwrap_err();
        assert!(matches!(err, RouteError::Api { .. }));
        assert!(err.to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).search("Katraj", "k").await;
        assert!(matches!(result, Err(RouteError::Geocoding { .. })));
    }

    #[tokio::test]
    async fn test_search_skips_malformed_geometry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "features": [ { "geometry": { "coordinates": [73.8] } } ]
            })))
            .mount(&server)
            .await;

        let candidates = client_for(&server).search("Katraj", "k").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_later_candidate_keeps_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "features": [
                    { "geometry": { "coordinates": [73.8580, 18.4575] } },
                    { "geometry": { "coordinates": [] } }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let status = LocationResolver::resolve_name(&client, "Katraj", "k").await;
        assert_eq!(
            status,
            GeocodeStatus::Found {
                name: "Katraj".to_string(),
                coordinate: Coordinate::new(18.4575, 73.8580),
            }
        );
    }

    #[test]
    fn test_search_url_encodes_text() {
        let config = GeocodingConfig {
            api_key: None,
            base_url: "https://api.openrouteservice.org/".to_string(),
            timeout_seconds: 5,
        };
        let client = OpenRouteServiceClient::new(&config).unwrap();
        assert_eq!(
            client.search_url("Katraj, Pune", "a&b"),
            "https://api.openrouteservice.org/geocode/search?api_key=a%26b&text=Katraj%2C%20Pune"
        );
    }
}
