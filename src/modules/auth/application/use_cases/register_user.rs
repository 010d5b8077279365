use std::sync::Arc;

use async_trait::async_trait;
use email_address::EmailAddress;
use tracing::{info, warn};

use crate::auth::application::domain::entities::{RegistrationMethod, User};
use crate::auth::application::ports::incoming::password_policy::{
    PasswordContext, PasswordPolicy,
};
use crate::auth::application::ports::outgoing::{
    CreateUserData, PasswordHasher, TokenPair, TokenProvider, UserQuery, UserRepository,
    UserRepositoryError,
};
use crate::shared::validation::{max_length_message, ValidationErrors};

pub use crate::shared::validation::BLANK;
pub const EMAIL_TAKEN: &str = "A user with that email already exists.";
const NAME_MAX_CHARS: usize = 150;

// ========================= Register Request =========================
/// Registration input with shape checks done. Password strength needs the
/// policy and is checked by the use case.
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

impl RegisterUserRequest {
    pub fn new(
        email: String,
        password: String,
        password2: String,
        first_name: String,
        last_name: String,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = email.trim().to_lowercase();
        if email.is_empty() {
            errors.add("email", BLANK);
        } else if !EmailAddress::is_valid(&email) {
            errors.add("email", "Enter a valid email address.");
        }

        if password.is_empty() {
            errors.add("password", BLANK);
        }
        if password != password2 {
            errors.add("password2", "Password fields didn't match.");
        }

        let first_name = Self::name(&mut errors, "first_name", first_name);
        let last_name = Self::name(&mut errors, "last_name", last_name);

        errors.into_result()?;

        Ok(Self {
            email,
            password,
            first_name,
            last_name,
        })
    }

    fn name(errors: &mut ValidationErrors, field: &str, value: String) -> String {
        let value = value.trim().to_string();
        if value.is_empty() {
            errors.add(field, BLANK);
        } else if value.chars().count() > NAME_MAX_CHARS {
            errors.add(
                field,
                max_length_message(NAME_MAX_CHARS),
            );
        }
        value
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

// ====================== Register Error =============================
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegisterUserError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Token generation failed: {0}")]
    TokenGenerationFailed(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Tokens plus the account they were issued for. Shared by every sign-in
/// flow.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub tokens: TokenPair,
    pub user: User,
}

#[async_trait]
pub trait IRegisterUserUseCase: Send + Sync {
    async fn execute(
        &self,
        request: RegisterUserRequest,
    ) -> Result<AuthSession, RegisterUserError>;
}

pub struct RegisterUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    query: Q,
    repository: R,
    password_hasher: Arc<dyn PasswordHasher>,
    password_policy: Arc<dyn PasswordPolicy>,
    token_provider: Arc<dyn TokenProvider>,
}

impl<Q, R> RegisterUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    pub fn new(
        query: Q,
        repository: R,
        password_hasher: Arc<dyn PasswordHasher>,
        password_policy: Arc<dyn PasswordPolicy>,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            query,
            repository,
            password_hasher,
            password_policy,
            token_provider,
        }
    }
}

#[async_trait]
impl<Q, R> IRegisterUserUseCase for RegisterUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    async fn execute(
        &self,
        request: RegisterUserRequest,
    ) -> Result<AuthSession, RegisterUserError> {
        let mut errors = ValidationErrors::new();

        let context = PasswordContext {
            email: request.email(),
            first_name: request.first_name(),
            last_name: request.last_name(),
        };
        if let Err(violations) = self.password_policy.validate(&request.password, &context) {
            for violation in violations {
                errors.add("password", violation.to_string());
            }
        }

        let existing = self
            .query
            .find_by_email(request.email())
            .await
            .map_err(|e| RegisterUserError::RepositoryError(e.to_string()))?;
        if existing.is_some() {
            errors.add("email", EMAIL_TAKEN);
        }

        errors.into_result().map_err(RegisterUserError::Validation)?;

        let password_hash = self
            .password_hasher
            .hash_password(&request.password)
            .await
            .map_err(|e| RegisterUserError::HashingFailed(e.to_string()))?;

        let user = self
            .repository
            .create_user(CreateUserData {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                password_hash: Some(password_hash),
                registration_method: RegistrationMethod::Email,
            })
            .await
            .map_err(|e| match e {
                // lost a race with a concurrent registration
                UserRepositoryError::UserAlreadyExists => {
                    warn!("Concurrent registration for the same email");
                    RegisterUserError::Validation(ValidationErrors::single("email", EMAIL_TAKEN))
                }
                other => RegisterUserError::RepositoryError(other.to_string()),
            })?;

        let tokens = self
            .token_provider
            .issue_pair(user.id)
            .map_err(|e| RegisterUserError::TokenGenerationFailed(e.to_string()))?;

        info!(user_id = %user.id, "User registered");
        Ok(AuthSession { tokens, user })
    }
}
