use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use reqwest::Client;
use serde::Deserialize;

use crate::config::FirebaseConfig;
use crate::error::AppError;

const JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Identity attested by the external provider for one request.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AppError>;
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

/// Validates RS256 ID tokens against the provider's published signing keys.
///
/// Keys are fetched over HTTPS and cached in-process; an unknown `kid`
/// triggers a refetch before the token is rejected.
pub struct FirebaseTokenVerifier {
    client: Client,
    config: FirebaseConfig,
    keys: RwLock<HashMap<String, Jwk>>,
}

impl FirebaseTokenVerifier {
    pub fn new(config: FirebaseConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Validation(format!("Failed to build http client: {e}")))?;

        Ok(Self {
            client,
            config,
            keys: RwLock::new(HashMap::new()),
        })
    }

    async fn fetch_keys(&self) -> Result<HashMap<String, Jwk>, AppError> {
        let response = self
            .client
            .get(JWKS_URL)
            .send()
            .await
            .map_err(|_| AppError::InternalServerError)?;

        if !response.status().is_success() {
            return Err(AppError::Unauthorized(format!(
                "Signing key endpoint returned {}",
                response.status()
            )));
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| AppError::Unauthorized(format!("Failed to parse signing keys: {e}")))?;

        Ok(set.keys.into_iter().map(|k| (k.kid.clone(), k)).collect())
    }

    async fn key_for(&self, kid: &str) -> Result<Jwk, AppError> {
        if let Some(jwk) = self.keys.read().expect("key cache poisoned").get(kid) {
            return Ok(jwk.clone());
        }

        // Provider keys rotate; refetch before rejecting the kid.
        let fresh = self.fetch_keys().await?;
        let mut cache = self.keys.write().expect("key cache poisoned");
        *cache = fresh;

        cache
            .get(kid)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Unknown token signing key".to_string()))
    }
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AppError> {
        let header = decode_header(token)
            .map_err(|_| AppError::Unauthorized("Malformed bearer token".to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::Unauthorized("Token has no key id".to_string()))?;

        let jwk = self.key_for(&kid).await?;
        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|_| AppError::Unauthorized("Invalid signing key".to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.project_id]);
        validation.set_issuer(&[self.config.issuer()]);

        let data = decode::<IdTokenClaims>(token, &key, &validation)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(VerifiedIdentity {
            uid: data.claims.sub,
            name: data.claims.name,
            email: data.claims.email,
            picture: data.claims.picture,
        })
    }
}

/// Accepts a fixed token-to-identity map. Used by tests in place of the
/// provider-backed verifier.
#[derive(Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, VerifiedIdentity>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, identity: VerifiedIdentity) -> Self {
        self.tokens.insert(token.to_string(), identity);
        self
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AppError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))
    }
}
