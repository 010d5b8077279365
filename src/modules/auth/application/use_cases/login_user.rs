use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::auth::application::ports::outgoing::{PasswordHasher, TokenProvider, UserQuery};
use crate::auth::application::use_cases::register_user::{AuthSession, BLANK};
use crate::shared::validation::ValidationErrors;

// ========================= Login Request =========================
#[derive(Debug, Clone)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    /// Only emptiness is checked here. A malformed email simply never
    /// matches an account and ends up as invalid credentials.
    pub fn new(email: String, password: String) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = email.trim().to_lowercase();
        if email.is_empty() {
            errors.add("email", BLANK);
        }
        if password.is_empty() {
            errors.add("password", BLANK);
        }

        errors.into_result()?;
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// ====================== Login Error =============================
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoginError {
    /// Unknown email, wrong password, password-less account or inactive
    /// account. All of them produce the same 401.
    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    #[error("Password verification failed: {0}")]
    PasswordVerificationFailed(String),

    #[error("Token generation failed: {0}")]
    TokenGenerationFailed(String),

    #[error("Query error: {0}")]
    QueryError(String),
}

#[async_trait]
pub trait ILoginUserUseCase: Send + Sync {
    async fn execute(&self, request: LoginRequest) -> Result<AuthSession, LoginError>;
}

pub struct LoginUserUseCase<Q>
where
    Q: UserQuery + Send + Sync,
{
    query: Q,
    password_hasher: Arc<dyn PasswordHasher>,
    token_provider: Arc<dyn TokenProvider>,
}

impl<Q> LoginUserUseCase<Q>
where
    Q: UserQuery + Send + Sync,
{
    pub fn new(
        query: Q,
        password_hasher: Arc<dyn PasswordHasher>,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            query,
            password_hasher,
            token_provider,
        }
    }
}

#[async_trait]
impl<Q> ILoginUserUseCase for LoginUserUseCase<Q>
where
    Q: UserQuery + Send + Sync,
{
    async fn execute(&self, request: LoginRequest) -> Result<AuthSession, LoginError> {
        let user = self
            .query
            .find_by_email(request.email())
            .await
            .map_err(|e| LoginError::QueryError(e.to_string()))?
            .ok_or(LoginError::InvalidCredentials)?;

        let Some(password_hash) = user.password_hash.as_deref() else {
            warn!(user_id = %user.id, "Password login attempted on a Google account");
            return Err(LoginError::InvalidCredentials);
        };

        let is_valid = self
            .password_hasher
            .verify_password(request.password(), password_hash)
            .await
            .map_err(|e| LoginError::PasswordVerificationFailed(e.to_string()))?;

        if !is_valid {
            return Err(LoginError::InvalidCredentials);
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login attempted on an inactive account");
            return Err(LoginError::InvalidCredentials);
        }

        let tokens = self
            .token_provider
            .issue_pair(user.id)
            .map_err(|e| LoginError::TokenGenerationFailed(e.to_string()))?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthSession { tokens, user })
    }
}
