use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::config::LineConfig;
use crate::core::error::{AppError, Result};

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct LineTokenResponse {
    pub access_token: String,
}

/// LINE user profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineProfile {
    pub user_id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

/// Client for the LINE Login OAuth endpoints
pub struct LineClient {
    http_client: reqwest::Client,
    config: LineConfig,
}

impl LineClient {
    pub fn new(config: LineConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> Result<LineTokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.callback_url.as_str()),
            ("client_id", self.config.channel_id.as_str()),
            ("client_secret", self.config.channel_secret.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("LINE token request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("LINE token exchange rejected: {} - {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "LINE token exchange failed with {}",
                status
            )));
        }

        response.json::<LineTokenResponse>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse LINE token response: {}", e))
        })
    }

    pub async fn get_profile(&self, access_token: &str) -> Result<LineProfile> {
        let response = self
            .http_client
            .get(&self.config.profile_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("LINE profile request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalServiceError(format!(
                "LINE profile request failed with {}",
                status
            )));
        }

        response.json::<LineProfile>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse LINE profile: {}", e))
        })
    }
}
