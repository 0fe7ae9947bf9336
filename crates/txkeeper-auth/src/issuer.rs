//! Access token issuance and validation
//!
//! Tokens are HS256 JWTs carrying only `sub`, `iss`, `aud` and `exp`.
//! Nothing is stored server side; a token stays valid until it expires.

use crate::credentials::{CredentialStore, SingleCredentialStore};
use crate::error::{AuthError, AuthResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use txkeeper_config::{Config, JwtConfig};

/// Smallest HMAC-SHA256 key accepted, in bytes
pub const MIN_SECRET_BYTES: usize = 32;

/// Claim set of an issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// An encoded token and the instant it stops being valid
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenIssuer {
    credentials: Arc<dyn CredentialStore>,
    settings: JwtConfig,
}

impl TokenIssuer {
    pub fn new(credentials: Arc<dyn CredentialStore>, settings: JwtConfig) -> Self {
        Self {
            credentials,
            settings,
        }
    }

    /// Issuer over the single configured account
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(SingleCredentialStore::from_config(&config.authentication)),
            config.jwt.clone(),
        )
    }

    /// Check a user name / password pair against the credential store
    pub fn authenticate(&self, user_name: &str, password: &str) -> bool {
        let valid = self.credentials.verify(user_name, password);
        if !valid {
            log::warn!("Rejected credentials for user {}", user_name);
        }
        valid
    }

    /// Mint a token for `user_name` expiring after the configured lifetime
    pub fn issue_token(&self, user_name: &str) -> AuthResult<IssuedToken> {
        self.issue_token_at(user_name, Utc::now())
    }

    /// Mint a token as if issued at `issued_at`
    pub fn issue_token_at(&self, user_name: &str, issued_at: DateTime<Utc>) -> AuthResult<IssuedToken> {
        let key = self.signing_secret()?;
        let lifetime = self.token_lifetime()?;
        let expires_at = issued_at.checked_add_signed(lifetime).ok_or_else(|| {
            AuthError::out_of_range(
                "jwt.token_expiration_seconds",
                "expiry is past the largest representable date",
            )
        })?;

        let claims = Claims {
            sub: user_name.to_string(),
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(key),
        )
        .map_err(|error| AuthError::Signing {
            message: error.to_string(),
        })?;

        log::info!("Issued token for user {} expiring at {}", user_name, expires_at);
        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature, issuer, audience and expiry of `token`
    pub fn validate_token(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.settings.issuer]);
        validation.set_audience(&[&self.settings.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let key = DecodingKey::from_secret(self.settings.secret_key.as_bytes());
        jsonwebtoken::decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|error| AuthError::InvalidToken {
                message: error.to_string(),
            })
    }

    /// Parse the configured lifetime.
    ///
    /// Fractional seconds are honoured down to milliseconds. Text that is not
    /// a number, a negative value, or one too large for a date offset is
    /// rejected.
    pub fn token_lifetime(&self) -> AuthResult<Duration> {
        const FIELD: &str = "jwt.token_expiration_seconds";
        let raw = self.settings.token_expiration_seconds.trim();

        let seconds: f64 = raw
            .parse()
            .map_err(|_| AuthError::out_of_range(FIELD, format!("'{}' is not a number", raw)))?;

        if !seconds.is_finite() {
            return Err(AuthError::out_of_range(FIELD, format!("'{}' is not finite", raw)));
        }
        if seconds < 0.0 {
            return Err(AuthError::out_of_range(FIELD, format!("'{}' is negative", raw)));
        }

        let millis = (seconds * 1000.0).round();
        if millis >= i64::MAX as f64 {
            return Err(AuthError::out_of_range(FIELD, format!("'{}' is too large", raw)));
        }

        Duration::try_milliseconds(millis as i64)
            .ok_or_else(|| AuthError::out_of_range(FIELD, format!("'{}' is too large", raw)))
    }

    fn signing_secret(&self) -> AuthResult<&[u8]> {
        let key = self.settings.secret_key.as_bytes();
        if key.len() < MIN_SECRET_BYTES {
            return Err(AuthError::out_of_range(
                "jwt.secret_key",
                format!(
                    "key is {} bits, HS256 needs at least {} bits",
                    key.len() * 8,
                    MIN_SECRET_BYTES * 8
                ),
            ));
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "Th1s 1s a very long secret key @ 2023";

    fn settings(expiration: &str) -> JwtConfig {
        JwtConfig {
            secret_key: SECRET.to_string(),
            issuer: "TestIssuer".to_string(),
            audience: "TestAudience".to_string(),
            token_expiration_seconds: expiration.to_string(),
        }
    }

    fn issuer(settings: JwtConfig) -> TokenIssuer {
        TokenIssuer::new(
            Arc::new(SingleCredentialStore::new("validUser", "validPassword")),
            settings,
        )
    }

    #[test]
    fn test_authenticate() {
        let issuer = issuer(settings("600"));
        assert!(issuer.authenticate("validUser", "validPassword"));
        assert!(!issuer.authenticate("invalidUser", "invalidPassword"));
        assert!(!issuer.authenticate("validUser", "wrong"));
    }

    #[test]
    fn test_issued_token_carries_configured_claims() {
        let issuer = issuer(settings("600"));
        let before = Utc::now().timestamp();

        let issued = issuer.issue_token("testUser").unwrap();
        let claims = issuer.validate_token(&issued.token).unwrap();

        assert_eq!(claims.sub, "testUser");
        assert_eq!(claims.iss, "TestIssuer");
        assert_eq!(claims.aud, "TestAudience");
        assert!(claims.exp > before);
        assert_eq!(claims.exp, issued.expires_at.timestamp());

        let header = jsonwebtoken::decode_header(&issued.token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_payload_has_only_expected_claims() {
        let issued = issuer(settings("600")).issue_token("testUser").unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_aud = false;

        let data = jsonwebtoken::decode::<serde_json::Value>(
            &issued.token,
            &DecodingKey::from_secret(b"ignored"),
            &validation,
        )
        .unwrap();
        let mut keys: Vec<&String> = data.claims.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["aud", "exp", "iss", "sub"]);
    }

    #[test]
    fn test_expiry_offset_from_issue_time() {
        let issuer = issuer(settings("90.5"));
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let issued = issuer.issue_token_at("testUser", issued_at).unwrap();
        assert_eq!(
            issued.expires_at - issued_at,
            Duration::try_milliseconds(90_500).unwrap()
        );
    }

    #[test]
    fn test_negative_expiration_rejected() {
        let result = issuer(settings("-1")).issue_token("testUser");
        assert!(matches!(
            result,
            Err(AuthError::ConfigurationOutOfRange { ref field, .. }) if field == "jwt.token_expiration_seconds"
        ));
    }

    #[test]
    fn test_non_numeric_expiration_rejected() {
        for raw in ["ten minutes", "", "NaN", "inf"] {
            let result = issuer(settings(raw)).issue_token("testUser");
            assert!(
                matches!(result, Err(AuthError::ConfigurationOutOfRange { .. })),
                "accepted {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_huge_expiration_rejected() {
        for raw in ["1e300", "9223372036854775807", "99999999999999"] {
            let result = issuer(settings(raw)).issue_token("testUser");
            assert!(
                matches!(result, Err(AuthError::ConfigurationOutOfRange { .. })),
                "accepted {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut short = settings("600");
        short.secret_key = "TestSecretKey".to_string();

        let result = issuer(short).issue_token("testUser");
        assert!(matches!(
            result,
            Err(AuthError::ConfigurationOutOfRange { ref field, .. }) if field == "jwt.secret_key"
        ));
    }

    #[test]
    fn test_validation_rejects_foreign_tokens() {
        let issued = issuer(settings("600")).issue_token("testUser").unwrap();

        let mut other_audience = settings("600");
        other_audience.audience = "SomeoneElse".to_string();
        assert!(matches!(
            issuer(other_audience).validate_token(&issued.token),
            Err(AuthError::InvalidToken { .. })
        ));

        let mut other_secret = settings("600");
        other_secret.secret_key = "a completely different secret of enough length".to_string();
        assert!(issuer(other_secret).validate_token(&issued.token).is_err());

        assert!(issuer(settings("600")).validate_token("not.a.token").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer(settings("10"));
        let long_ago = Utc::now() - Duration::try_hours(2).unwrap();

        let issued = issuer.issue_token_at("testUser", long_ago).unwrap();
        assert!(issuer.validate_token(&issued.token).is_err());
    }
}
