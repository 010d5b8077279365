use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::ports::outgoing::avatar_storage::{
    AvatarStorage, AvatarStorageError,
};

const AVATAR_DIR: &str = "avatars";

/// Writes avatars under `{media_root}/avatars/`. Serving the files is left to
/// whatever sits in front of the API.
#[derive(Debug, Clone)]
pub struct LocalAvatarStorage {
    media_root: PathBuf,
}

impl LocalAvatarStorage {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    /// Only plain relative paths inside `avatars/` resolve.
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = Path::new(relative);
        let inside = path.starts_with(AVATAR_DIR)
            && path.components().all(|c| matches!(c, Component::Normal(_)));

        inside.then(|| self.media_root.join(path))
    }
}

#[async_trait]
impl AvatarStorage for LocalAvatarStorage {
    async fn store(
        &self,
        user_id: Uuid,
        extension: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AvatarStorageError> {
        let dir = self.media_root.join(AVATAR_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AvatarStorageError::Io(e.to_string()))?;

        let file_name = format!("{}-{}.{}", user_id, Uuid::new_v4().simple(), extension);
        tokio::fs::write(dir.join(&file_name), bytes)
            .await
            .map_err(|e| AvatarStorageError::Io(e.to_string()))?;

        Ok(format!("{AVATAR_DIR}/{file_name}"))
    }

    async fn remove(&self, path: &str) -> Result<(), AvatarStorageError> {
        let Some(full) = self.resolve(path) else {
            tracing::warn!(%path, "Refusing to remove avatar outside the media root");
            return Ok(());
        };

        match tokio::fs::remove_file(full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AvatarStorageError::Io(e.to_string())),
        }
    }
}
