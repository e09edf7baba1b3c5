use crate::core::error::{AppError, Result};
use crate::features::line_auth::clients::{LineClient, LineProfile};

/// Completes the LINE Login redirect flow
pub struct LineAuthService {
    client: LineClient,
}

impl LineAuthService {
    pub fn new(client: LineClient) -> Self {
        Self { client }
    }

    /// Trade the callback's authorization code for the user's profile
    pub async fn complete_login(&self, code: Option<&str>) -> Result<LineProfile> {
        let code = code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::BadRequest("Authorization code is missing".to_string()))?;

        let token = self.client.exchange_code(code).await?;
        let profile = self.client.get_profile(&token.access_token).await?;

        tracing::info!("LINE login completed for {}", profile.user_id);
        Ok(profile)
    }
}
