use async_trait::async_trait;

use crate::auth::application::{
    domain::entities::{User, UserId},
    ports::outgoing::UserQuery,
    use_cases::fetch_profile::{FetchProfileError, FetchProfileUseCase},
};

pub struct FetchProfileService<Q>
where
    Q: UserQuery + Send + Sync,
{
    user_query: Q,
}

impl<Q> FetchProfileService<Q>
where
    Q: UserQuery + Send + Sync,
{
    pub fn new(query: Q) -> Self {
        Self { user_query: query }
    }
}

#[async_trait]
impl<Q> FetchProfileUseCase for FetchProfileService<Q>
where
    Q: UserQuery + Send + Sync,
{
    async fn execute(&self, user_id: UserId) -> Result<User, FetchProfileError> {
        self.user_query
            .find_by_id(user_id.value())
            .await?
            .ok_or(FetchProfileError::UserNotFound(user_id))
    }
}
