use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::{RegistrationMethod, User};

#[derive(Debug, Clone)]
pub struct CreateUserData {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `None` stores an unusable password.
    pub password_hash: Option<String>,
    pub registration_method: RegistrationMethod,
}

/// Profile fields a user may change on their own account. `None` keeps the
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UpdateProfileData {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, data: CreateUserData) -> Result<User, UserRepositoryError>;

    async fn update_profile(
        &self,
        user_id: Uuid,
        data: UpdateProfileData,
    ) -> Result<User, UserRepositoryError>;

    async fn set_avatar(
        &self,
        user_id: Uuid,
        avatar_path: Option<String>,
    ) -> Result<User, UserRepositoryError>;
}
