use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum TokenRepositoryError {
    DatabaseError(String),
}

impl std::fmt::Display for TokenRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for TokenRepositoryError {}

/// Refresh-token blacklist. Entries live until the token would have expired
/// anyway.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn blacklist_token(
        &self,
        token_hash: String,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenRepositoryError>;

    /// Blacklists the token unless it already is, in a single step.
    /// `Ok(false)` means another caller got there first.
    async fn blacklist_if_absent(
        &self,
        token_hash: String,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, TokenRepositoryError>;

    async fn is_token_blacklisted(&self, token_hash: &str) -> Result<bool, TokenRepositoryError>;
}
