use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;

use crate::core::config::TraffyConfig;
use crate::core::error::{AppError, Result};
use crate::features::traffy::models::TraffyState;

// The public API rejects requests that do not look like they come from a browser
const BROWSER_ACCEPT: &str = "application/json, text/plain, */*";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36 OPR/115.0.0.0";

/// GeoJSON feature collection as returned by the organization endpoint.
/// Features are kept opaque and forwarded unchanged.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Value>,
}

/// Client for the public Traffy Fondue GeoJSON API
pub struct TraffyClient {
    http_client: reqwest::Client,
    stat_api_url: String,
    fondue_api_url: String,
    org_key: String,
}

impl TraffyClient {
    pub fn new(config: &TraffyConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            stat_api_url: config.stat_api_url.clone(),
            fondue_api_url: config.fondue_api_url.clone(),
            org_key: config.org_key.clone(),
        })
    }

    /// City-wide statistics feed for one state, passed through as-is
    pub async fn fetch_stat(&self, state: TraffyState) -> Result<Value> {
        let url = format!("{}?state_type={}", self.stat_api_url, state.as_str());
        self.get_json(&url).await
    }

    /// Reports of the configured organization in one state
    pub async fn fetch_org_features(&self, state: TraffyState) -> Result<FeatureCollection> {
        let url = format!(
            "{}?org_key={}&state_type={}",
            self.fondue_api_url,
            urlencoding::encode(&self.org_key),
            state.as_str()
        );
        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("GET {}", url);

        let response = self.http_client.get(url).send().await.map_err(|e| {
            let reason = if e.is_timeout() { "timed out" } else { "failed" };
            AppError::ExternalServiceError(format!("Traffy API request {}: {}", reason, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Traffy API returned {}: {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Traffy API returned {}",
                status
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse Traffy API response: {}", e))
        })
    }
}
