use log::{debug, error, warn};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    RequestBuilder,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::listing::{ListingPage, SyncFilters};
use crate::{config::CasafariConfig, errors::TransportError, sync::walker::ListingSource};

const PROPERTIES_PATH: &str = "/api/v1/properties";
const ALERTS_PATH: &str = "/api/v1/alerts";

/// HTTP client for the Casafari listings API. Every request carries the
/// configured basic auth credentials and is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct CasafariClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    per_page: u32,
}

impl CasafariClient {
    pub fn new(config: &CasafariConfig) -> Result<CasafariClient, TransportError> {
        let mut headers: HeaderMap = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(CasafariClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            per_page: config.per_page,
        })
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .basic_auth(&self.api_key, Some(&self.api_secret))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, TransportError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetches one page of listings matching `filters`.
    pub async fn get_properties(
        &self,
        filters: &SyncFilters,
        page: u32,
        per_page: u32,
    ) -> Result<ListingPage, TransportError> {
        debug!("Fetching Casafari properties page {page} ({filters})");

        let request = self
            .get(PROPERTIES_PATH)
            .query(filters)
            .query(&[("page", page), ("per_page", per_page)]);

        // Page failures are reported by the sync run
        self.send_json(request).await.map_err(|e| {
            debug!("Casafari API error on properties page {page} ({filters}): {e}");
            e
        })
    }

    pub async fn get_property(&self, property_id: &str) -> Result<Value, TransportError> {
        let request = self.get(&format!("{PROPERTIES_PATH}/{property_id}"));

        self.send_json(request).await.map_err(|e| {
            error!("Casafari API error fetching property {property_id}: {e}");
            e
        })
    }

    pub async fn search_by_location(&self, location: &str) -> Result<ListingPage, TransportError> {
        let filters = SyncFilters {
            location: Some(location.to_string()),
            ..SyncFilters::default()
        };
        self.get_properties(&filters, 1, self.per_page).await
    }

    pub async fn get_properties_by_type(
        &self,
        property_type: &str,
    ) -> Result<ListingPage, TransportError> {
        let filters = SyncFilters {
            property_type: Some(property_type.to_string()),
            ..SyncFilters::default()
        };
        self.get_properties(&filters, 1, self.per_page).await
    }

    /// Property alerts (FSBO leads).
    pub async fn get_alerts(&self) -> Result<Value, TransportError> {
        self.send_json(self.get(ALERTS_PATH)).await.map_err(|e| {
            error!("Casafari API error fetching alerts: {e}");
            e
        })
    }

    pub async fn get_comparables(&self, property_id: &str) -> Result<Value, TransportError> {
        let request = self.get(&format!("{PROPERTIES_PATH}/{property_id}/comparables"));

        self.send_json(request).await.map_err(|e| {
            error!("Casafari API error fetching comparables for {property_id}: {e}");
            e
        })
    }

    /// Requests a single listing and reports whether the API accepted the
    /// credentials. Never fails.
    pub async fn test_connection(&self) -> bool {
        let response = self
            .get(PROPERTIES_PATH)
            .query(&[("per_page", 1)])
            .send()
            .await;

        match response {
            Ok(r) if r.status().is_success() => true,
            Ok(r) => {
                warn!("Casafari connection test got status {}", r.status());
                false
            }
            Err(e) => {
                error!("Casafari connection test failed: {e}");
                false
            }
        }
    }
}

impl ListingSource for CasafariClient {
    async fn fetch_page(
        &self,
        filters: &SyncFilters,
        page: u32,
        per_page: u32,
    ) -> Result<ListingPage, TransportError> {
        self.get_properties(filters, page, per_page).await
    }
}
