// ==================== IDENTITY VERIFICATION ====================
// ID tokens are issued by the external identity provider; this service only
// verifies them: RS256 signature against the provider's published JWKS,
// audience/issuer pinned to the configured project.

use base64::Engine;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::sync::Mutex;

const JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const KEY_CACHE_TTL_SECONDS: u64 = 3600; // provider rotates keys slowly

/// Verified identity claims attached to gated requests.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub aud: String,
    pub iss: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Jwk {
    pub kid: String,
    pub kty: String,
    pub n: String,
    pub e: String,
}

#[derive(Debug, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct ServiceAccount {
    project_id: String,
}

struct CachedKeys {
    keys: HashMap<String, Jwk>,
    fetched_at: std::time::Instant,
}

lazy_static! {
    static ref KEY_CACHE: Mutex<Option<CachedKeys>> = Mutex::new(None);
}

/// Reads the project id from the base64-encoded service-account blob.
pub fn project_id() -> Result<String, String> {
    let blob = env::var("FB_SERVICE_KEY")
        .map_err(|_| "FB_SERVICE_KEY not found in environment".to_string())?;

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(blob.trim())
        .map_err(|e| format!("Invalid FB_SERVICE_KEY encoding: {}", e))?;

    let account: ServiceAccount = serde_json::from_slice(&decoded)
        .map_err(|e| format!("Invalid FB_SERVICE_KEY payload: {}", e))?;

    Ok(account.project_id)
}

async fn fetch_keys() -> Result<HashMap<String, Jwk>, String> {
    log::debug!("🔑 Fetching identity provider JWKS");

    let client = reqwest::Client::new();
    let response = client
        .get(JWKS_URL)
        .header("Accept", "application/json")
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| format!("Failed to fetch signing keys: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("Signing key endpoint error: {}", response.status()));
    }

    let jwks: JwkSet = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse signing keys: {}", e))?;

    Ok(jwks
        .keys
        .into_iter()
        .map(|key| (key.kid.clone(), key))
        .collect())
}

/// Looks up the signing key for a `kid`, refreshing the cache when stale.
async fn signing_key(kid: &str) -> Result<Jwk, String> {
    {
        let cache = KEY_CACHE.lock().unwrap();
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed().as_secs() < KEY_CACHE_TTL_SECONDS {
                if let Some(key) = cached.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }
    }

    let keys = fetch_keys().await?;
    let key = keys.get(kid).cloned();

    {
        let mut cache = KEY_CACHE.lock().unwrap();
        *cache = Some(CachedKeys {
            keys,
            fetched_at: std::time::Instant::now(),
        });
    }

    key.ok_or_else(|| format!("Unknown signing key id '{}'", kid))
}

/// Verifies a bearer ID token and returns its claims.
pub async fn verify_id_token(token: &str) -> Result<Claims, String> {
    let project = project_id()?;

    let header = decode_header(token).map_err(|e| format!("Malformed token: {}", e))?;
    let kid = header
        .kid
        .ok_or_else(|| "Token has no key id".to_string())?;

    let jwk = signing_key(&kid).await?;
    let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
        .map_err(|e| format!("Invalid signing key: {}", e))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[&project]);
    validation.set_issuer(&[format!("https://securetoken.google.com/{}", project)]);

    let data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| format!("Token verification failed: {}", e))?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwk_set_parsing() {
        let body = serde_json::json!({
            "keys": [
                { "kid": "a1b2", "kty": "RSA", "alg": "RS256", "use": "sig",
                  "n": "0vx7agoebGcQSuuPiLJXZpt", "e": "AQAB" },
                { "kid": "c3d4", "kty": "RSA", "alg": "RS256", "use": "sig",
                  "n": "qL8aBc", "e": "AQAB" }
            ]
        });

        let jwks: JwkSet = serde_json::from_value(body).unwrap();
        assert_eq!(jwks.keys.len(), 2);
        assert_eq!(jwks.keys[0].kid, "a1b2");
        assert_eq!(jwks.keys[1].e, "AQAB");
    }

    #[tokio::test]
    async fn test_project_id_from_encoded_blob() {
        let blob = base64::engine::general_purpose::STANDARD
            .encode(r#"{"type":"service_account","project_id":"parcel-demo"}"#);
        std::env::set_var("FB_SERVICE_KEY", &blob);

        assert_eq!(project_id().unwrap(), "parcel-demo");

        // Garbage tokens fail before any network round trip
        let result = verify_id_token("not-a-jwt").await;
        assert!(result.unwrap_err().starts_with("Malformed token"));
    }
}
