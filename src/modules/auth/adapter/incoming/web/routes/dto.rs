use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::application::domain::entities::User;
use crate::auth::application::ports::outgoing::TokenPair;
use crate::auth::application::use_cases::register_user::AuthSession;

/// Public view of an account.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: Uuid,

    #[schema(example = "ada@example.com")]
    pub email: String,

    #[schema(example = "Ada")]
    pub first_name: String,

    #[schema(example = "Lovelace")]
    pub last_name: String,

    #[schema(example = "Ada Lovelace")]
    pub full_name: String,

    /// `email` or `google`
    #[schema(example = "email")]
    pub registration_method: String,

    pub is_premium: bool,

    pub is_staff: bool,

    /// Absolute path of the avatar under the media URL, if one was uploaded
    #[schema(example = "/media/avatars/123e4567-e89b-12d3-a456-426614174000-9f1c.png")]
    pub avatar_url: Option<String>,

    pub date_joined: DateTime<Utc>,
}

impl UserDto {
    pub fn from_user(user: &User, media_url: &str) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            registration_method: user.registration_method.to_string(),
            is_premium: user.is_premium,
            is_staff: user.is_staff,
            avatar_url: user
                .avatar_path
                .as_ref()
                .map(|path| format!("{}/{}", media_url, path.trim_start_matches('/'))),
            date_joined: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairDto {
    /// Short-lived access token, sent as `Authorization: Bearer`
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access: String,

    /// Long-lived refresh token, single use
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh: String,
}

impl From<TokenPair> for TokenPairDto {
    fn from(pair: TokenPair) -> Self {
        Self {
            access: pair.access_token,
            refresh: pair.refresh_token,
        }
    }
}

/// Response of every sign-in flow.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthSessionDto {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access: String,

    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh: String,

    pub user: UserDto,
}

impl AuthSessionDto {
    pub fn new(session: AuthSession, media_url: &str) -> Self {
        Self {
            access: session.tokens.access_token,
            refresh: session.tokens.refresh_token,
            user: UserDto::from_user(&session.user, media_url),
        }
    }
}
