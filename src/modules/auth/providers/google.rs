use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{IdentityVerifier, VerifiedIdentity};
use crate::shared::error::{AppError, AppResult};

pub struct GoogleVerifier {
    client_id: String,
    client: Client,
}

impl GoogleVerifier {
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            client: Client::new(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct TokenInfoResponse {
    sub: String,
    aud: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[async_trait]
impl IdentityVerifier for GoogleVerifier {
    async fn verify(&self, credential: &str) -> AppResult<VerifiedIdentity> {
        if self.client_id.is_empty() {
            return Err(AppError::Unauthorized(
                "Google sign-in is not configured".to_string(),
            ));
        }

        let response = self
            .client
            .get("https://oauth2.googleapis.com/tokeninfo")
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| {
                AppError::InternalServerError(format!("Google tokeninfo request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::Unauthorized(
                "Invalid Google credential".to_string(),
            ));
        }

        let info = response.json::<TokenInfoResponse>().await.map_err(|e| {
            AppError::InternalServerError(format!("Google tokeninfo parse failed: {}", e))
        })?;

        // The token must have been issued for this application.
        if info.aud != self.client_id {
            return Err(AppError::Unauthorized(
                "Google credential issued for another application".to_string(),
            ));
        }

        Ok(VerifiedIdentity {
            provider_id: info.sub,
            email: info.email,
            name: info.name,
            avatar: info.picture,
        })
    }
}
