//! Identity resolution. The engine never bootstraps identities itself; it asks
//! an [`IdentityResolver`] for a stable anonymous token and treats failure as
//! "not eligible".

use crate::error::{AppError, AppResult};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn new(token: impl Into<String>) -> AppResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AppError::IdentityError("empty identity token".to_string()));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Must be repeatable and return the same token once established.
    async fn ensure_identity(&self) -> AppResult<IdentityToken>;
}

/// Identity carried by an already-verified bearer token. The auth middleware
/// puts the subject into request extensions; a request without one resolves
/// to an identity error.
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    subject: Option<String>,
}

impl RequestIdentity {
    pub fn new(subject: Option<String>) -> Self {
        Self { subject }
    }
}

#[async_trait]
impl IdentityResolver for RequestIdentity {
    async fn ensure_identity(&self) -> AppResult<IdentityToken> {
        match self.subject.as_deref() {
            Some(sub) => IdentityToken::new(sub),
            None => Err(AppError::IdentityError(
                "request carries no identity".to_string(),
            )),
        }
    }
}
