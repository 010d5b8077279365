use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::application::ports::outgoing::{
    TokenProvider, TokenRepository, TokenRepositoryError,
};
use crate::auth::application::services::hash::hash_token;
use crate::auth::application::use_cases::refresh_token::expiry_of;
use crate::shared::validation::ValidationErrors;

// ========================= Logout Request =========================
#[derive(Debug, Clone)]
pub struct LogoutRequest {
    refresh_token: String,
}

impl LogoutRequest {
    pub fn new(refresh_token: Option<String>) -> Result<Self, ValidationErrors> {
        match refresh_token.map(|t| t.trim().to_string()) {
            Some(token) if !token.is_empty() => Ok(Self {
                refresh_token: token,
            }),
            _ => Err(ValidationErrors::single(
                "refresh",
                "Refresh token is required.",
            )),
        }
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

// ====================== Logout Error =============================
#[derive(Debug, Clone)]
pub enum LogoutError {
    /// Undecodable, expired or not a refresh token.
    InvalidToken(String),
    /// The refresh token was issued to someone other than the caller.
    TokenNotOwned,
    DatabaseError(String),
}

impl std::fmt::Display for LogoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogoutError::InvalidToken(msg) => write!(f, "Invalid refresh token: {}", msg),
            LogoutError::TokenNotOwned => {
                write!(f, "Refresh token does not belong to the current user")
            }
            LogoutError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for LogoutError {}

impl From<TokenRepositoryError> for LogoutError {
    fn from(error: TokenRepositoryError) -> Self {
        match error {
            TokenRepositoryError::DatabaseError(msg) => LogoutError::DatabaseError(msg),
        }
    }
}

// ============================ Logout Use Case =============================
#[async_trait]
pub trait ILogoutUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid, request: LogoutRequest) -> Result<(), LogoutError>;
}

#[derive(Clone)]
pub struct LogoutUseCase<R>
where
    R: TokenRepository + Send + Sync,
{
    token_repository: R,
    token_provider: Arc<dyn TokenProvider>,
}

impl<R> LogoutUseCase<R>
where
    R: TokenRepository + Send + Sync,
{
    pub fn new(token_repository: R, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            token_repository,
            token_provider,
        }
    }
}

#[async_trait]
impl<R> ILogoutUseCase for LogoutUseCase<R>
where
    R: TokenRepository + Send + Sync,
{
    async fn execute(&self, user_id: Uuid, request: LogoutRequest) -> Result<(), LogoutError> {
        let claims = self
            .token_provider
            .verify_refresh_token(request.refresh_token())
            .map_err(|e| {
                warn!(%user_id, error = %e, "Logout with an unusable refresh token");
                LogoutError::InvalidToken(e.to_string())
            })?;

        if claims.sub != user_id {
            warn!(%user_id, token_owner = %claims.sub, "Logout with a foreign refresh token");
            return Err(LogoutError::TokenNotOwned);
        }

        // Only the digest is stored.
        let token_hash = hash_token(request.refresh_token());
        self.token_repository
            .blacklist_token(token_hash, claims.sub, expiry_of(claims.exp))
            .await?;

        info!(%user_id, "Refresh token blacklisted on logout");
        Ok(())
    }
}
