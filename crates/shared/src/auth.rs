//! Authentication types for identity-provider tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience the identity provider stamps on end-user access tokens.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// JWT claims for access tokens.
///
/// Mirrors the token issued by the hosted auth service so the same JSON can
/// be handed to Postgres as `request.jwt.claims`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID, equal to `auth.users.id`).
    pub sub: Uuid,
    /// Email of the signed-in user.
    #[serde(default)]
    pub email: String,
    /// Database role the token maps to.
    #[serde(default = "default_role")]
    pub role: String,
    /// Audience.
    #[serde(default = "default_audience")]
    pub aud: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

fn default_role() -> String {
    AUTHENTICATED_AUDIENCE.to_string()
}

fn default_audience() -> String {
    AUTHENTICATED_AUDIENCE.to_string()
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, email: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_lowercase(),
            role: default_role(),
            aud: default_audience(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Login request.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Corporate email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Sign-up request.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    /// Display name.
    pub nome: String,
    /// Corporate email.
    pub email: String,
    /// Advisor code at the custody house.
    pub codigo_xp: String,
    /// Password.
    pub password: String,
}

/// Session returned after a successful login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

/// Refresh request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token from a previous login.
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_lowercases_email() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, "Advisor@SvnInvest.com.br", Utc::now() + Duration::hours(1));
        assert_eq!(claims.user_id(), id);
        assert_eq!(claims.email, "advisor@svninvest.com.br");
        assert_eq!(claims.aud, AUTHENTICATED_AUDIENCE);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_claims_deserialize_provider_token_payload() {
        let payload = serde_json::json!({
            "sub": "49bfe132-04dc-4552-9088-99acea0f9310",
            "email": "a@svninvest.com.br",
            "aud": "authenticated",
            "role": "authenticated",
            "iat": 1_700_000_000,
            "exp": 1_700_003_600,
            "session_id": "ignored"
        });
        let claims: Claims = serde_json::from_value(payload).unwrap();
        assert_eq!(
            claims.sub.to_string(),
            "49bfe132-04dc-4552-9088-99acea0f9310"
        );
        assert_eq!(claims.role, "authenticated");
    }
}
