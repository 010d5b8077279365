use async_trait::async_trait;

use crate::auth::application::{
    domain::entities::{User, UserId},
    ports::outgoing::{UpdateProfileData, UserRepositoryError},
};
use crate::shared::validation::{max_length_message, ValidationErrors};

const NAME_MAX_CHARS: usize = 150;

/// Names the caller wants to change. Absent fields keep their value, so PUT
/// and PATCH share this input. Email and flags are read-only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateProfileInput {
    first_name: Option<String>,
    last_name: Option<String>,
}

impl UpdateProfileInput {
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let first_name = Self::name(&mut errors, "first_name", first_name);
        let last_name = Self::name(&mut errors, "last_name", last_name);
        errors.into_result()?;

        Ok(Self {
            first_name,
            last_name,
        })
    }

    fn name(errors: &mut ValidationErrors, field: &str, value: Option<String>) -> Option<String> {
        let value = value?.trim().to_string();
        if value.chars().count() > NAME_MAX_CHARS {
            errors.add(
                field,
                max_length_message(NAME_MAX_CHARS),
            );
        }
        Some(value)
    }

    pub fn into_data(self) -> UpdateProfileData {
        UpdateProfileData {
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

#[derive(Debug, thiserror::Error, Clone)]
pub enum UpdateProfileError {
    #[error("User not found")]
    UserNotFound,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<UserRepositoryError> for UpdateProfileError {
    fn from(error: UserRepositoryError) -> Self {
        match error {
            UserRepositoryError::UserNotFound => UpdateProfileError::UserNotFound,
            other => UpdateProfileError::RepositoryError(other.to_string()),
        }
    }
}

#[async_trait]
pub trait UpdateProfileUseCase: Send + Sync {
    async fn execute(
        &self,
        user_id: UserId,
        input: UpdateProfileInput,
    ) -> Result<User, UpdateProfileError>;
}
