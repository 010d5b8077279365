use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::auth::application::ports::outgoing::google_token_verifier::{
    GoogleIdentity, GoogleTokenError, GoogleTokenVerifier,
};

pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];
const KEYS_TTL: Duration = Duration::from_secs(3600);
/// Unknown `kid`s inside this window are rejected from cache.
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct GoogleClaims {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: EmailVerified,
    given_name: Option<String>,
    family_name: Option<String>,
}

/// Google has shipped `email_verified` both as a bool and as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmailVerified {
    Bool(bool),
    Text(String),
}

impl Default for EmailVerified {
    fn default() -> Self {
        EmailVerified::Bool(false)
    }
}

impl EmailVerified {
    fn is_true(&self) -> bool {
        match self {
            EmailVerified::Bool(b) => *b,
            EmailVerified::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Verifies Google ID tokens offline against Google's published JWKS.
/// Keys are cached for an hour and refetched early when an unknown `kid`
/// shows up (Google rotates keys), at most once per [`MIN_REFETCH_INTERVAL`].
pub struct GoogleIdTokenVerifier {
    client_id: String,
    http: reqwest::Client,
    certs_url: String,
    cache: RwLock<Option<CachedKeys>>,
    refreshable: bool,
}

impl GoogleIdTokenVerifier {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            http: reqwest::Client::new(),
            certs_url: GOOGLE_CERTS_URL.to_string(),
            cache: RwLock::new(None),
            refreshable: true,
        }
    }

    /// Pins the key set and never goes to the network.
    pub fn with_static_keys(client_id: impl Into<String>, keys: JwkSet) -> Self {
        Self {
            client_id: client_id.into(),
            http: reqwest::Client::new(),
            certs_url: GOOGLE_CERTS_URL.to_string(),
            cache: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            })),
            refreshable: false,
        }
    }

    async fn fetch_keys(&self) -> Result<JwkSet, GoogleTokenError> {
        tracing::debug!(url = %self.certs_url, "Fetching Google signing keys");

        self.http
            .get(&self.certs_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| GoogleTokenError::Transport(e.to_string()))?
            .json::<JwkSet>()
            .await
            .map_err(|e| GoogleTokenError::Transport(e.to_string()))
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, GoogleTokenError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                let age = cached.fetched_at.elapsed();
                if !self.refreshable || age < KEYS_TTL {
                    if let Some(jwk) = cached.keys.find(kid) {
                        return key_from(jwk);
                    }
                }
                if age < MIN_REFETCH_INTERVAL {
                    return Err(unknown_kid(kid));
                }
            }
        }

        if !self.refreshable {
            return Err(unknown_kid(kid));
        }

        // Held across the fetch so concurrent misses share one request.
        let mut cache = self.cache.write().await;
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < MIN_REFETCH_INTERVAL {
                return cached.keys.find(kid).map_or_else(|| Err(unknown_kid(kid)), key_from);
            }
        }

        let keys = self.fetch_keys().await?;
        let key = keys.find(kid).map(key_from).transpose()?;
        *cache = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        key.ok_or_else(|| unknown_kid(kid))
    }
}

fn key_from(jwk: &jsonwebtoken::jwk::Jwk) -> Result<DecodingKey, GoogleTokenError> {
    DecodingKey::from_jwk(jwk).map_err(|e| GoogleTokenError::InvalidToken(e.to_string()))
}

fn unknown_kid(kid: &str) -> GoogleTokenError {
    GoogleTokenError::InvalidToken(format!("unknown key id {kid}"))
}

#[async_trait]
impl GoogleTokenVerifier for GoogleIdTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, GoogleTokenError> {
        let header =
            decode_header(id_token).map_err(|e| GoogleTokenError::InvalidToken(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(GoogleTokenError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| GoogleTokenError::InvalidToken("missing kid".to_string()))?;

        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let claims = decode::<GoogleClaims>(id_token, &key, &validation)
            .map_err(|e| {
                tracing::warn!(error = %e, "Google ID token rejected");
                GoogleTokenError::InvalidToken(e.to_string())
            })?
            .claims;

        Ok(GoogleIdentity {
            subject: claims.sub,
            email: claims.email,
            email_verified: claims.email_verified.is_true(),
            given_name: claims.given_name,
            family_name: claims.family_name,
        })
    }
}
