use super::sea_orm_entity::users::{Column as UserColumn, Entity as UserEntity, Model as UserModel};
use crate::auth::application::domain::entities::User;
use crate::auth::application::ports::outgoing::user_query::{UserQuery, UserQueryError};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct UserQueryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserQueryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_domain(model: Option<UserModel>) -> Result<Option<User>, UserQueryError> {
        model
            .map(|m| m.into_domain().map_err(UserQueryError::InvalidRow))
            .transpose()
    }
}

#[async_trait]
impl UserQuery for UserQueryPostgres {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserQueryError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))?;

        Self::to_domain(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserQueryError> {
        let user = UserEntity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(UserColumn::Email)))
                    .eq(email.trim().to_lowercase()),
            )
            .one(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))?;

        Self::to_domain(user)
    }
}
