//! Password hashing and access token handling

use crate::contract::RequirementsError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject email
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Hash a password with bcrypt on the blocking pool
pub async fn hash_password(password: &str, cost: u32) -> Result<String, RequirementsError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing task failed");
            RequirementsError::Internal
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            RequirementsError::Internal
        })
}

/// Check a password against a stored bcrypt hash
///
/// A malformed hash counts as a mismatch.
pub async fn verify_password(password: &str, hashed: &str) -> Result<bool, RequirementsError> {
    let password = password.to_string();
    let hashed = hashed.to_string();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            RequirementsError::Internal
        })?;
    match verified {
        Ok(ok) => Ok(ok),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            Ok(false)
        }
    }
}

/// Signs and verifies HS256 access tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    pub fn issue(&self, email: &str, now: DateTime<Utc>) -> Result<String, RequirementsError> {
        let exp = now.checked_add_signed(self.lifetime).ok_or_else(|| {
            tracing::error!(lifetime = ?self.lifetime, "Access token expiry overflows");
            RequirementsError::Internal
        })?;
        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign access token");
            RequirementsError::Internal
        })
    }

    /// Returns the subject email of a valid token
    pub fn verify(&self, token: &str) -> Result<String, RequirementsError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e
            .kind()
        {
            ErrorKind::ExpiredSignature => RequirementsError::TokenExpired,
            _ => RequirementsError::InvalidToken,
        })?;

        if data.claims.sub.is_empty() {
            return Err(RequirementsError::InvalidToken);
        }
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_HASH_COST: u32 = 4;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("unit-test-secret", Duration::minutes(30))
    }

    #[tokio::test]
    async fn test_password_hash_roundtrip() {
        let hashed = hash_password("ValidPass1!", TEST_HASH_COST)
            .await
            .expect("hash");
        assert_ne!(hashed, "ValidPass1!");
        assert!(verify_password("ValidPass1!", &hashed).await.expect("verify"));
        assert!(!verify_password("WrongPass1!", &hashed).await.expect("verify"));
    }

    #[tokio::test]
    async fn test_malformed_hash_is_a_mismatch() {
        assert!(!verify_password("ValidPass1!", "not-a-hash").await.expect("verify"));
    }

    #[test]
    fn test_token_carries_subject() {
        let issuer = issuer();
        let token = issuer.issue("test@example.com", Utc::now()).expect("issue");
        assert_eq!(issuer.verify(&token).expect("verify"), "test@example.com");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issuer = issuer();
        let token = issuer
            .issue("test@example.com", Utc::now() - Duration::minutes(31))
            .expect("issue");
        assert_eq!(issuer.verify(&token), Err(RequirementsError::TokenExpired));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let token = TokenIssuer::new("other-secret", Duration::minutes(30))
            .issue("test@example.com", Utc::now())
            .expect("issue");
        assert_eq!(issuer().verify(&token), Err(RequirementsError::InvalidToken));
        assert_eq!(issuer().verify("garbage"), Err(RequirementsError::InvalidToken));
    }
}
