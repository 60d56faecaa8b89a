//! Keyword place search backed by the Kakao Local API.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::wire::error_for_status;
use super::PlaceSearch;
use crate::error::{Error, Result, ValidationIssue};
use crate::models::{validate_coordinates, PlaceResult};
use crate::util::{normalize_base_url, normalize_text_option};

pub const KAKAO_LOCAL_BASE_URL: &str = "https://dapi.kakao.com";
const SEARCH_ROUTE: &str = "/v2/local/search/keyword.json";
const SEARCH_TIMEOUT_SECS: u64 = 6;

/// Place search client authenticated with a Kakao REST API key.
#[derive(Clone)]
pub struct KakaoPlaceSearch {
    base_url: String,
    rest_api_key: String,
    client: Client,
}

impl std::fmt::Debug for KakaoPlaceSearch {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("KakaoPlaceSearch")
            .field("base_url", &self.base_url)
            .field("rest_api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl KakaoPlaceSearch {
    pub fn new(rest_api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(KAKAO_LOCAL_BASE_URL, rest_api_key)
    }

    pub fn with_base_url(base_url: &str, rest_api_key: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url).map_err(Error::Config)?;
        let rest_api_key = normalize_text_option(Some(rest_api_key.into()))
            .ok_or_else(|| Error::Config("Kakao REST API key must not be empty".to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .build()
            .map_err(|error| Error::Config(format!("Failed to construct HTTP client: {error}")))?;
        Ok(Self {
            base_url,
            rest_api_key,
            client,
        })
    }
}

impl PlaceSearch for KakaoPlaceSearch {
    async fn search_places(&self, keyword: &str) -> Result<Vec<PlaceResult>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ValidationIssue::EmptyKeyword.into());
        }

        let response = self
            .client
            .get(format!("{}{}", self.base_url, SEARCH_ROUTE))
            .header("Authorization", format!("KakaoAK {}", self.rest_api_key))
            .query(&[("query", keyword)])
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &body, "place search"));
        }
        let payload = response.json::<KakaoSearchResponse>().await?;
        Ok(payload.into_places())
    }
}

#[derive(Debug, Deserialize)]
struct KakaoSearchResponse {
    documents: Vec<KakaoDocument>,
}

#[derive(Debug, Deserialize)]
struct KakaoDocument {
    place_name: String,
    #[serde(default)]
    address_name: Option<String>,
    #[serde(default)]
    road_address_name: Option<String>,
    /// Longitude, as a decimal string
    x: String,
    /// Latitude, as a decimal string
    y: String,
}

impl KakaoSearchResponse {
    fn into_places(self) -> Vec<PlaceResult> {
        self.documents
            .into_iter()
            .filter_map(|document| match document.into_place() {
                Ok(place) => Some(place),
                Err(reason) => {
                    tracing::warn!("Skipping place search result: {}", reason);
                    None
                }
            })
            .collect()
    }
}

impl KakaoDocument {
    fn into_place(self) -> std::result::Result<PlaceResult, String> {
        let lng = self
            .x
            .trim()
            .parse::<f64>()
            .map_err(|error| format!("'{}' has invalid x: {error}", self.place_name))?;
        let lat = self
            .y
            .trim()
            .parse::<f64>()
            .map_err(|error| format!("'{}' has invalid y: {error}", self.place_name))?;
        validate_coordinates(lat, lng)
            .map_err(|issue| format!("'{}': {}", self.place_name, issue.describe()))?;
        let address = normalize_text_option(self.road_address_name)
            .or_else(|| normalize_text_option(self.address_name))
            .unwrap_or_default();

        Ok(PlaceResult {
            name: self.place_name,
            address,
            lat,
            lng,
        })
    }
}
