use async_trait::async_trait;

use crate::auth::application::{
    domain::entities::{User, UserId},
    ports::outgoing::user_query::UserQueryError,
};

#[derive(Debug, thiserror::Error, Clone)]
pub enum FetchProfileError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Query error: {0}")]
    QueryError(#[from] UserQueryError),
}

#[async_trait]
pub trait FetchProfileUseCase: Send + Sync {
    async fn execute(&self, user_id: UserId) -> Result<User, FetchProfileError>;
}
