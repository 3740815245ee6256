//! Bearer token verification.
//!
//! Tokens are issued by an external identity provider and verified here with
//! a shared HS256 secret. The storefront never issues tokens itself; the only
//! claims it consumes are `sub` (the numeric user id) and optionally `email`.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use clementine_core::UserId;

use crate::config::AuthConfig;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token failed signature or claim validation.
    #[error("invalid bearer token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// The `sub` claim is not a numeric user id.
    #[error("token subject is not a user id")]
    InvalidSubject,
}

/// Claims expected in a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric user id, as a string.
    pub sub: String,
    /// Expiry (unix seconds). Always validated.
    pub exp: i64,
    /// Optional email claim, carried into the auth context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Optional issuer claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Optional audience claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// The authenticated caller, as derived from a verified token.
///
/// Inserted into request extensions by the auth middleware and into the
/// GraphQL context by the handler.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Option<String>,
}

/// Verifies bearer tokens against the configured secret and claims.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier from the auth configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let key = DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = &config.audience {
            validation.set_audience(&[audience]);
        } else {
            validation.validate_aud = false;
        }

        Self { key, validation }
    }

    /// Verify a bearer token and extract the auth context.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for signature/claim failures and
    /// `AuthError::InvalidSubject` when `sub` is not a numeric id.
    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;

        let id = data
            .claims
            .sub
            .parse::<i32>()
            .map_err(|_| AuthError::InvalidSubject)?;

        Ok(AuthUser {
            id: UserId::new(id),
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use secrecy::SecretString;

    const SECRET: &str = "kJ8vQ2xN5mR7cT4wY6uI9oP1aS3dF0gH";

    fn config(issuer: Option<&str>) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::from(SECRET),
            issuer: issuer.map(String::from),
            audience: None,
        }
    }

    fn token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> Claims {
        Claims {
            sub: "42".to_string(),
            exp: chrono::Utc::now().timestamp() + 3600,
            email: Some("user@example.com".to_string()),
            iss: None,
            aud: None,
        }
    }

    #[test]
    fn accepts_a_valid_token() {
        let verifier = TokenVerifier::new(&config(None));
        let user = verifier.verify(&token(&valid_claims(), SECRET)).unwrap();
        assert_eq!(user.id, UserId::new(42));
        assert_eq!(user.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn rejects_a_token_signed_with_another_secret() {
        let verifier = TokenVerifier::new(&config(None));
        let result = verifier.verify(&token(
            &valid_claims(),
            "aZ9yX8wV7uT6sR5qP4oN3mL2kJ1iH0gF",
        ));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_an_expired_token() {
        let verifier = TokenVerifier::new(&config(None));
        let mut claims = valid_claims();
        claims.exp = chrono::Utc::now().timestamp() - 3600;
        let result = verifier.verify(&token(&claims, SECRET));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_a_non_numeric_subject() {
        let verifier = TokenVerifier::new(&config(None));
        let mut claims = valid_claims();
        claims.sub = "not-a-number".to_string();
        let result = verifier.verify(&token(&claims, SECRET));
        assert!(matches!(result, Err(AuthError::InvalidSubject)));
    }

    #[test]
    fn enforces_the_configured_issuer() {
        let verifier = TokenVerifier::new(&config(Some("https://id.example.com")));

        let mut claims = valid_claims();
        claims.iss = Some("https://id.example.com".to_string());
        assert!(verifier.verify(&token(&claims, SECRET)).is_ok());

        claims.iss = Some("https://rogue.example.com".to_string());
        assert!(matches!(
            verifier.verify(&token(&claims, SECRET)),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
