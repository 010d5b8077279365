use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::auth::application::domain::entities::RegistrationMethod;
use crate::auth::application::ports::outgoing::{
    CreateUserData, GoogleTokenError, GoogleTokenVerifier, TokenProvider, UserQuery,
    UserRepository, UserRepositoryError,
};
use crate::auth::application::use_cases::register_user::AuthSession;
use crate::shared::validation::ValidationErrors;

#[derive(Debug, Clone)]
pub struct GoogleAuthRequest {
    id_token: String,
}

impl GoogleAuthRequest {
    pub fn new(id_token: Option<String>) -> Result<Self, ValidationErrors> {
        match id_token.map(|t| t.trim().to_string()) {
            Some(token) if !token.is_empty() => Ok(Self { id_token: token }),
            _ => Err(ValidationErrors::single(
                "id_token",
                "Google ID token is required.",
            )),
        }
    }

    pub fn id_token(&self) -> &str {
        &self.id_token
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GoogleAuthError {
    #[error("Invalid Google token: {0}")]
    InvalidToken(String),

    #[error("Google account has no verified email")]
    EmailNotVerified,

    #[error("An account with this email already exists. Please log in with your password.")]
    AccountExistsWithPassword,

    #[error("User account is disabled")]
    AccountInactive,

    #[error("Google key service unavailable: {0}")]
    Upstream(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("Token generation failed: {0}")]
    TokenGenerationFailed(String),
}

#[async_trait]
pub trait IGoogleAuthUseCase: Send + Sync {
    async fn execute(&self, request: GoogleAuthRequest) -> Result<AuthSession, GoogleAuthError>;
}

/// Sign-in (and first-time sign-up) with a Google ID token.
pub struct GoogleAuthUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    query: Q,
    repository: R,
    verifier: Arc<dyn GoogleTokenVerifier>,
    token_provider: Arc<dyn TokenProvider>,
}

impl<Q, R> GoogleAuthUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    pub fn new(
        query: Q,
        repository: R,
        verifier: Arc<dyn GoogleTokenVerifier>,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            query,
            repository,
            verifier,
            token_provider,
        }
    }
}

#[async_trait]
impl<Q, R> IGoogleAuthUseCase for GoogleAuthUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    async fn execute(&self, request: GoogleAuthRequest) -> Result<AuthSession, GoogleAuthError> {
        let identity = self
            .verifier
            .verify(request.id_token())
            .await
            .map_err(|e| match e {
                GoogleTokenError::InvalidToken(msg) => GoogleAuthError::InvalidToken(msg),
                GoogleTokenError::Transport(msg) => {
                    error!(error = %msg, "Could not fetch Google signing keys");
                    GoogleAuthError::Upstream(msg)
                }
            })?;

        let email = match identity.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => email.to_lowercase(),
            _ => {
                return Err(GoogleAuthError::InvalidToken(
                    "token carries no email claim".to_string(),
                ))
            }
        };
        if !identity.email_verified {
            warn!(subject = %identity.subject, "Google email not verified");
            return Err(GoogleAuthError::EmailNotVerified);
        }

        let existing = self
            .query
            .find_by_email(&email)
            .await
            .map_err(|e| GoogleAuthError::RepositoryError(e.to_string()))?;

        let user = match existing {
            Some(user) if user.registration_method == RegistrationMethod::Email => {
                warn!(user_id = %user.id, "Google sign-in for a password account");
                return Err(GoogleAuthError::AccountExistsWithPassword);
            }
            Some(user) if !user.is_active => return Err(GoogleAuthError::AccountInactive),
            Some(user) => user,
            None => {
                let created = self
                    .repository
                    .create_user(CreateUserData {
                        email,
                        first_name: identity.given_name.unwrap_or_default(),
                        last_name: identity.family_name.unwrap_or_default(),
                        password_hash: None,
                        registration_method: RegistrationMethod::Google,
                    })
                    .await
                    .map_err(|e| match e {
                        // created by a concurrent request with a password
                        UserRepositoryError::UserAlreadyExists => {
                            GoogleAuthError::AccountExistsWithPassword
                        }
                        other => GoogleAuthError::RepositoryError(other.to_string()),
                    })?;
                info!(user_id = %created.id, "User created from Google sign-in");
                created
            }
        };

        let tokens = self
            .token_provider
            .issue_pair(user.id)
            .map_err(|e| GoogleAuthError::TokenGenerationFailed(e.to_string()))?;

        Ok(AuthSession { tokens, user })
    }
}
