use crate::shared::error::AppResult;
use async_trait::async_trait;

pub mod google;

/// Identity attributes vouched for by an external provider.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub provider_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> AppResult<VerifiedIdentity>;
}
