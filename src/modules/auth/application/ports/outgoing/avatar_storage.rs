use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AvatarStorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),
}

/// Where uploaded avatars live. Paths returned by `store` are relative and
/// are what gets persisted on the user row.
#[async_trait]
pub trait AvatarStorage: Send + Sync {
    async fn store(
        &self,
        user_id: Uuid,
        extension: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AvatarStorageError>;

    async fn remove(&self, path: &str) -> Result<(), AvatarStorageError>;
}
