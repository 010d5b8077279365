use crate::auth::application::{
    domain::entities::{User, UserId},
    ports::outgoing::UserRepository,
    use_cases::update_profile::{UpdateProfileError, UpdateProfileInput, UpdateProfileUseCase},
};
use async_trait::async_trait;

pub struct UpdateProfileService<R>
where
    R: UserRepository + Send + Sync,
{
    user_repository: R,
}

impl<R> UpdateProfileService<R>
where
    R: UserRepository + Send + Sync,
{
    pub fn new(repository: R) -> Self {
        Self {
            user_repository: repository,
        }
    }
}

#[async_trait]
impl<R> UpdateProfileUseCase for UpdateProfileService<R>
where
    R: UserRepository + Send + Sync,
{
    async fn execute(
        &self,
        user_id: UserId,
        input: UpdateProfileInput,
    ) -> Result<User, UpdateProfileError> {
        let user = self
            .user_repository
            .update_profile(user_id.value(), input.into_data())
            .await?;

        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::auth_fakes::{sample_user, InMemoryUsers};
    use uuid::Uuid;

    #[tokio::test]
    async fn only_given_names_change() {
        let user = sample_user("ada@example.com");
        let id = user.id;
        let users = InMemoryUsers::new().with_user(user);

        let updated = UpdateProfileService::new(users.clone())
            .execute(
                id.into(),
                UpdateProfileInput::new(Some("Augusta".into()), None).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Augusta");
        assert_eq!(updated.last_name, "Lovelace");
        assert_eq!(users.get(id).unwrap().first_name, "Augusta");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let result = UpdateProfileService::new(InMemoryUsers::new())
            .execute(
                Uuid::new_v4().into(),
                UpdateProfileInput::new(Some("X".into()), None).unwrap(),
            )
            .await;
        assert!(matches!(result, Err(UpdateProfileError::UserNotFound)));
    }
}
