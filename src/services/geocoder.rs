use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use crate::models::Coordinates;

/// Errors that can occur while geocoding an address
///
/// All of them are treated the same by the cache: the address stays
/// unresolved for now and is retried on the next lookup.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Geocoder returned error: {0}")]
    ApiError(String),

    #[error("Address not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Geocoder did not answer within {0:?}")]
    Timeout(Duration),
}

/// Turns an address into coordinates
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

/// Yandex HTTP geocoder client
///
/// The API key is given at construction and sent with every request.
pub struct YandexGeocoder {
    base_url: String,
    api_key: String,
    client: Client,
}

impl YandexGeocoder {
    /// Create a new geocoder client
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl GeocodeProvider for YandexGeocoder {
    async fn fetch(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let url = format!(
            "{}?geocode={}&apikey={}&format=json",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(address),
            urlencoding::encode(&self.api_key),
        );

        tracing::debug!("Geocoding address: {}", address);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Geocoder failed for {:?}: {} - {}", address, status, body);
            return Err(GeocodeError::ApiError(format!("Failed to geocode: {}", status)));
        }

        let json: Value = response.json().await?;

        parse_position(&json, address)
    }
}

/// Extract the most relevant point from a geocoder response
///
/// The position is a `"<longitude> <latitude>"` string.
pub fn parse_position(json: &Value, address: &str) -> Result<Coordinates, GeocodeError> {
    let found_places = json
        .pointer("/response/GeoObjectCollection/featureMember")
        .and_then(|members| members.as_array())
        .ok_or_else(|| GeocodeError::InvalidResponse("Missing featureMember array".into()))?;

    let most_relevant = found_places
        .first()
        .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;

    let pos = most_relevant
        .pointer("/GeoObject/Point/pos")
        .and_then(|pos| pos.as_str())
        .ok_or_else(|| GeocodeError::InvalidResponse("Missing GeoObject.Point.pos".into()))?;

    let mut parts = pos.split_whitespace().map(str::parse::<f64>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(longitude)), Some(Ok(latitude)), None) => {
            let coordinates = Coordinates::new(latitude, longitude);
            if !coordinates.is_valid() {
                return Err(GeocodeError::InvalidResponse(format!(
                    "Position out of range: {:?}",
                    pos
                )));
            }
            Ok(coordinates)
        }
        _ => Err(GeocodeError::InvalidResponse(format!("Malformed position: {:?}", pos))),
    }
}
