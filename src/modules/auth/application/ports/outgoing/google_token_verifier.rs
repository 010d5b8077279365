use async_trait::async_trait;

/// Identity asserted by a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    pub subject: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GoogleTokenError {
    /// Bad signature, wrong audience or issuer, expired, or not a JWT at all.
    #[error("Invalid Google ID token: {0}")]
    InvalidToken(String),

    /// Google's signing keys could not be fetched.
    #[error("Google key service unavailable: {0}")]
    Transport(String),
}

#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, GoogleTokenError>;
}
