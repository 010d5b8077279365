use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::auth::application::domain::entities::{RegistrationMethod, User};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: Option<String>,
    pub registration_method: String,
    pub is_premium: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub avatar_path: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        use chrono::Utc;
        use sea_orm::ActiveValue::Set;

        if !insert {
            self.updated_at = Set(Utc::now().into());
        }

        Ok(self)
    }
}

impl Model {
    /// Fails only when `registration_method` holds something the CHECK
    /// constraint should have rejected.
    pub fn into_domain(self) -> Result<User, String> {
        let registration_method = self.registration_method.parse::<RegistrationMethod>()?;

        Ok(User {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash: self.password_hash,
            registration_method,
            is_premium: self.is_premium,
            is_active: self.is_active,
            is_staff: self.is_staff,
            avatar_path: self.avatar_path,
            created_at: self.created_at.with_timezone(&chrono::Utc),
            updated_at: self.updated_at.with_timezone(&chrono::Utc),
        })
    }
}
