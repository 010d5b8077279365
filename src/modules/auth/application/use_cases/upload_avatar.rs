use async_trait::async_trait;

use crate::auth::application::{
    domain::entities::{User, UserId},
    ports::outgoing::{AvatarStorageError, UserRepositoryError},
};

/// Image formats accepted as avatars, recognised by their magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl AvatarFormat {
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(AvatarFormat::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(AvatarFormat::Jpeg),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(AvatarFormat::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => {
                Some(AvatarFormat::Webp)
            }
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AvatarFormat::Png => "png",
            AvatarFormat::Jpeg => "jpg",
            AvatarFormat::Gif => "gif",
            AvatarFormat::Webp => "webp",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AvatarUpload {
    format: AvatarFormat,
    bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AvatarUploadError {
    #[error("No file was submitted.")]
    Empty,

    #[error("File too large. Maximum size is {max_bytes} bytes.")]
    TooLarge { max_bytes: usize },

    #[error("Upload a valid image (PNG, JPEG, GIF or WebP).")]
    NotAnImage,
}

impl AvatarUpload {
    pub fn new(bytes: Vec<u8>, max_bytes: usize) -> Result<Self, AvatarUploadError> {
        if bytes.is_empty() {
            return Err(AvatarUploadError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(AvatarUploadError::TooLarge { max_bytes });
        }
        let format = AvatarFormat::detect(&bytes).ok_or(AvatarUploadError::NotAnImage)?;

        Ok(Self { format, bytes })
    }

    pub fn format(&self) -> AvatarFormat {
        self.format
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[derive(Debug, thiserror::Error, Clone)]
pub enum UploadAvatarError {
    #[error("User not found")]
    UserNotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] AvatarStorageError),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<UserRepositoryError> for UploadAvatarError {
    fn from(error: UserRepositoryError) -> Self {
        match error {
            UserRepositoryError::UserNotFound => UploadAvatarError::UserNotFound,
            other => UploadAvatarError::RepositoryError(other.to_string()),
        }
    }
}

#[async_trait]
pub trait UploadAvatarUseCase: Send + Sync {
    async fn execute(
        &self,
        user_id: UserId,
        upload: AvatarUpload,
    ) -> Result<User, UploadAvatarError>;
}
