use crate::error::{AppError, AppResult};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Bearer token claims. `sub` is the anonymous identity token issued by the
/// identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String,
}

/// Verifies access tokens minted by the identity provider sharing this secret.
#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)?;

        if claims.token_type != "access" {
            return Err(AppError::AuthError("Invalid access token type".to_string()));
        }
        if claims.sub.trim().is_empty() {
            return Err(AppError::AuthError("Token has no subject".to_string()));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn issue(secret: &str, sub: &str, expires_in_secs: i64, token_type: &str) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
            token_type: token_type.to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verifies_subject() {
        let jwt = JwtService::new("secret");
        let token = issue("secret", "anon-123", 3600, "access");
        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, "anon-123");
    }

    #[test]
    fn test_rejects_foreign_secret_and_expired_token() {
        let jwt = JwtService::new("secret");
        let token = issue("other", "anon-123", 3600, "access");
        assert!(jwt.verify_access_token(&token).is_err());

        // beyond the default 60s leeway
        let expired = issue("secret", "anon-123", -600, "access");
        assert!(jwt.verify_access_token(&expired).is_err());
    }

    #[test]
    fn test_rejects_empty_subject_and_refresh_tokens() {
        let jwt = JwtService::new("secret");
        let token = issue("secret", "  ", 3600, "access");
        assert!(matches!(
            jwt.verify_access_token(&token),
            Err(AppError::AuthError(_))
        ));
        let refresh = issue("secret", "anon-123", 3600, "refresh");
        assert!(matches!(
            jwt.verify_access_token(&refresh),
            Err(AppError::AuthError(_))
        ));
    }
}
