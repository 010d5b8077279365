use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::auth::application::ports::outgoing::{
    TokenError, TokenPair, TokenProvider, TokenRepository, UserQuery,
};
use crate::auth::application::services::hash::hash_token;
use crate::auth::application::use_cases::register_user::BLANK;
use crate::shared::validation::ValidationErrors;

// ========================= Refresh Token Request =========================
#[derive(Debug, Clone)]
pub struct RefreshTokenRequest {
    refresh_token: String,
}

impl RefreshTokenRequest {
    pub fn new(refresh_token: String) -> Result<Self, ValidationErrors> {
        let refresh_token = refresh_token.trim();
        if refresh_token.is_empty() {
            return Err(ValidationErrors::single("refresh", BLANK));
        }

        Ok(Self {
            refresh_token: refresh_token.to_string(),
        })
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

// ====================== Refresh Token Error =============================
#[derive(Debug, Clone)]
pub enum RefreshTokenError {
    TokenExpired,
    TokenInvalid,
    InvalidTokenType,
    TokenBlacklisted,
    UserInactive,
    BlacklistError(String),
    QueryError(String),
    TokenGenerationFailed(String),
}

impl std::fmt::Display for RefreshTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshTokenError::TokenExpired => write!(f, "Refresh token has expired"),
            RefreshTokenError::TokenInvalid => write!(f, "Token is invalid or expired"),
            RefreshTokenError::InvalidTokenType => write!(f, "Token has wrong type"),
            RefreshTokenError::TokenBlacklisted => write!(f, "Token is blacklisted"),
            RefreshTokenError::UserInactive => write!(f, "User not found or inactive"),
            RefreshTokenError::BlacklistError(msg) => write!(f, "Blacklist error: {}", msg),
            RefreshTokenError::QueryError(msg) => write!(f, "Query error: {}", msg),
            RefreshTokenError::TokenGenerationFailed(msg) => {
                write!(f, "Token generation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for RefreshTokenError {}

impl From<TokenError> for RefreshTokenError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::TokenExpired => RefreshTokenError::TokenExpired,
            TokenError::InvalidTokenType(_) => RefreshTokenError::InvalidTokenType,
            TokenError::TokenNotYetValid
            | TokenError::InvalidSignature
            | TokenError::MalformedToken => RefreshTokenError::TokenInvalid,
            TokenError::EncodingError(msg) => RefreshTokenError::TokenGenerationFailed(msg),
        }
    }
}

pub(crate) fn expiry_of(exp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(exp, 0).unwrap_or_else(Utc::now)
}

// ============================ Refresh Token Use Case =============================
#[async_trait]
pub trait IRefreshTokenUseCase: Send + Sync {
    async fn execute(&self, request: RefreshTokenRequest) -> Result<TokenPair, RefreshTokenError>;
}

/// Rotating refresh: every successful call blacklists the presented token,
/// so each refresh token works exactly once.
pub struct RefreshTokenUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: TokenRepository + Send + Sync,
{
    query: Q,
    token_repository: R,
    token_provider: Arc<dyn TokenProvider>,
}

impl<Q, R> RefreshTokenUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: TokenRepository + Send + Sync,
{
    pub fn new(query: Q, token_repository: R, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            query,
            token_repository,
            token_provider,
        }
    }
}

#[async_trait]
impl<Q, R> IRefreshTokenUseCase for RefreshTokenUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: TokenRepository + Send + Sync,
{
    async fn execute(&self, request: RefreshTokenRequest) -> Result<TokenPair, RefreshTokenError> {
        let claims = self
            .token_provider
            .verify_refresh_token(request.refresh_token())?;

        let user = self
            .query
            .find_by_id(claims.sub)
            .await
            .map_err(|e| RefreshTokenError::QueryError(e.to_string()))?;
        match user {
            Some(user) if user.is_active => {}
            _ => return Err(RefreshTokenError::UserInactive),
        }

        // Claiming the token is the rotation; a lost race is a replay.
        let token_hash = hash_token(request.refresh_token());
        let claimed = self
            .token_repository
            .blacklist_if_absent(token_hash, claims.sub, expiry_of(claims.exp))
            .await
            .map_err(|e| RefreshTokenError::BlacklistError(e.to_string()))?;
        if !claimed {
            warn!(user_id = %claims.sub, "Blacklisted refresh token presented");
            return Err(RefreshTokenError::TokenBlacklisted);
        }

        let pair = self.token_provider.issue_pair(claims.sub)?;

        info!(user_id = %claims.sub, "Refresh token rotated");
        Ok(pair)
    }
}
