use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::application::{
    domain::entities::{User, UserId},
    ports::outgoing::{AvatarStorage, UserQuery, UserRepository},
    use_cases::upload_avatar::{AvatarUpload, UploadAvatarError, UploadAvatarUseCase},
};

/// Stores the new file, points the user at it, then drops the previous file.
pub struct UploadAvatarService<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    user_query: Q,
    user_repository: R,
    storage: Arc<dyn AvatarStorage>,
}

impl<Q, R> UploadAvatarService<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    pub fn new(user_query: Q, user_repository: R, storage: Arc<dyn AvatarStorage>) -> Self {
        Self {
            user_query,
            user_repository,
            storage,
        }
    }
}

#[async_trait]
impl<Q, R> UploadAvatarUseCase for UploadAvatarService<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    async fn execute(
        &self,
        user_id: UserId,
        upload: AvatarUpload,
    ) -> Result<User, UploadAvatarError> {
        let current = self
            .user_query
            .find_by_id(user_id.value())
            .await
            .map_err(|e| UploadAvatarError::RepositoryError(e.to_string()))?
            .ok_or(UploadAvatarError::UserNotFound)?;

        let extension = upload.format().extension();
        let path = self
            .storage
            .store(user_id.value(), extension, upload.into_bytes())
            .await?;

        let user = match self
            .user_repository
            .set_avatar(user_id.value(), Some(path.clone()))
            .await
        {
            Ok(user) => user,
            Err(e) => {
                // the row never pointed at the new file
                if let Err(cleanup) = self.storage.remove(&path).await {
                    tracing::warn!(%path, error = %cleanup, "Orphaned avatar file");
                }
                return Err(e.into());
            }
        };

        if let Some(previous) = current.avatar_path {
            if let Err(e) = self.storage.remove(&previous).await {
                tracing::warn!(path = %previous, error = %e, "Could not remove old avatar");
            }
        }

        tracing::info!(user_id = %user.id, "Avatar updated");
        Ok(user)
    }
}
