//! Bearer-token authentication
//!
//! Client-credential token issuance and verification. Tokens are a hex-encoded
//! JSON payload plus a keyed SHA-256 digest over a server secret, expiring
//! after a configurable interval. The loan endpoints require a valid token;
//! issuance itself is the only unauthenticated operation besides the health
//! check.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::Config;

/// Token verification failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,
}

/// Claims carried inside an issued token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub client_id: String,
    /// Expiry as unix seconds.
    pub exp: i64,
    /// Random token id, so repeated issuance never collides.
    pub jti: String,
}

/// An issued bearer token with its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Issues and verifies bearer tokens for configured clients.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expiration_minutes: i64,
    clients: HashMap<String, String>,
}

impl TokenService {
    pub fn new(
        secret: impl Into<String>,
        expiration_minutes: i64,
        clients: HashMap<String, String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes,
            clients,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.auth_secret.clone(),
            config.token_expiration_minutes,
            config.auth_clients.clone(),
        )
    }

    /// Check a client id/secret pair against the configured clients.
    pub fn validate_client(&self, client_id: &str, client_secret: &str) -> bool {
        self.clients
            .get(client_id)
            .is_some_and(|expected| expected == client_secret)
    }

    /// Issue a signed, expiring token for a client.
    pub fn issue(&self, client_id: &str) -> IssuedToken {
        let expires_in = self.expiration_minutes * 60;
        let claims = TokenClaims {
            client_id: client_id.to_string(),
            exp: Utc::now().timestamp() + expires_in,
            jti: hex::encode(rand::random::<[u8; 16]>()),
        };

        // Serialization of a plain struct cannot fail
        let payload =
            serde_json::to_vec(&claims).expect("token claims serialize to JSON");
        let token = format!("{}.{}", hex::encode(&payload), self.digest(&payload));

        IssuedToken { token, expires_in }
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let (payload_hex, signature) = token.split_once('.').ok_or(AuthError::Malformed)?;
        let payload = hex::decode(payload_hex).map_err(|_| AuthError::Malformed)?;

        if self.digest(&payload) != signature {
            return Err(AuthError::BadSignature);
        }

        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::Malformed)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }

    fn digest(&self, payload: &[u8]) -> String {
        let hash = Sha256::new()
            .chain_update(self.secret.as_bytes())
            .chain_update(payload)
            .finalize();
        hex::encode(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(expiration_minutes: i64) -> TokenService {
        let clients = HashMap::from([("portal".to_string(), "portal-secret".to_string())]);
        TokenService::new("test-signing-secret", expiration_minutes, clients)
    }

    #[test]
    fn test_validate_client() {
        let service = service(60);
        assert!(service.validate_client("portal", "portal-secret"));
        assert!(!service.validate_client("portal", "wrong"));
        assert!(!service.validate_client("unknown", "portal-secret"));
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = service(60);
        let issued = service.issue("portal");

        assert_eq!(issued.expires_in, 3600);

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.client_id, "portal");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_tokens_are_unique_per_issue() {
        let service = service(60);
        assert_ne!(service.issue("portal").token, service.issue("portal").token);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service(0);
        let issued = service.issue("portal");
        assert_eq!(service.verify(&issued.token), Err(AuthError::Expired));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let service = service(60);
        let issued = service.issue("portal");

        let (payload_hex, signature) = issued.token.split_once('.').unwrap();
        let mut forged_payload = hex::decode(payload_hex).unwrap();
        forged_payload[0] ^= 0xff;
        let forged = format!("{}.{}", hex::encode(forged_payload), signature);

        assert_eq!(service.verify(&forged), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = service(60).issue("portal");
        let other = TokenService::new("other-secret", 60, HashMap::new());
        assert_eq!(other.verify(&issued.token), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = service(60);
        assert_eq!(service.verify("not-a-token"), Err(AuthError::Malformed));
        assert_eq!(service.verify("zzzz.abcd"), Err(AuthError::Malformed));
    }
}
