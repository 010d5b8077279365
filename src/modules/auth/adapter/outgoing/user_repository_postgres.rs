use async_trait::async_trait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::entities::User;
use crate::auth::application::ports::outgoing::user_repository::{
    CreateUserData, UpdateProfileData, UserRepository, UserRepositoryError,
};

use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel,
};

#[derive(Clone, Debug)]
pub struct UserRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn to_domain(model: UserModel) -> Result<User, UserRepositoryError> {
        model
            .into_domain()
            .map_err(UserRepositoryError::DatabaseError)
    }

    async fn load(&self, user_id: Uuid) -> Result<UserModel, UserRepositoryError> {
        UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?
            .ok_or(UserRepositoryError::UserNotFound)
    }
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    let err_str = err.to_string().to_lowercase();
    err_str.contains("23505")
        || err_str.contains("duplicate key")
        || err_str.contains("unique constraint")
}

#[async_trait]
impl UserRepository for UserRepositoryPostgres {
    async fn create_user(&self, data: CreateUserData) -> Result<User, UserRepositoryError> {
        let active_user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(data.email.trim().to_string()),
            first_name: Set(data.first_name),
            last_name: Set(data.last_name),
            password_hash: Set(data.password_hash),
            registration_method: Set(data.registration_method.as_str().to_string()),
            is_premium: Set(false),
            is_active: Set(true),
            is_staff: Set(false),
            avatar_path: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let inserted = active_user.insert(&*self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                return UserRepositoryError::UserAlreadyExists;
            }
            UserRepositoryError::DatabaseError(e.to_string())
        })?;

        Self::to_domain(inserted)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        data: UpdateProfileData,
    ) -> Result<User, UserRepositoryError> {
        let user = self.load(user_id).await?;
        if data.is_empty() {
            return Self::to_domain(user);
        }

        let mut active_user: UserActiveModel = user.into();
        if let Some(first_name) = data.first_name {
            active_user.first_name = Set(first_name);
        }
        if let Some(last_name) = data.last_name {
            active_user.last_name = Set(last_name);
        }

        let updated = active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Self::to_domain(updated)
    }

    async fn set_avatar(
        &self,
        user_id: Uuid,
        avatar_path: Option<String>,
    ) -> Result<User, UserRepositoryError> {
        let user = self.load(user_id).await?;

        let mut active_user: UserActiveModel = user.into();
        active_user.avatar_path = Set(avatar_path);

        let updated = active_user
            .update(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Self::to_domain(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::adapter::outgoing::sea_orm_entity::users::fixtures::user_model;
    use crate::auth::application::domain::entities::RegistrationMethod;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_data() -> CreateUserData {
        CreateUserData {
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password_hash: Some("$argon2id$v=19$stub".to_string()),
            registration_method: RegistrationMethod::Email,
        }
    }

    #[tokio::test]
    async fn create_user_returns_the_inserted_row() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_model(user_id, "ada@example.com")]])
            .into_connection();

        let user = UserRepositoryPostgres::new(Arc::new(db))
            .create_user(create_data())
            .await
            .unwrap();

        assert_eq!(user.id, user_id);
        assert_eq!(user.first_name, "Ada");
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn google_user_is_stored_without_password() {
        let mut row = user_model(Uuid::new_v4(), "g@example.com");
        row.password_hash = None;
        row.registration_method = "google".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row]])
            .into_connection();

        let user = UserRepositoryPostgres::new(Arc::new(db))
            .create_user(CreateUserData {
                password_hash: None,
                registration_method: RegistrationMethod::Google,
                ..create_data()
            })
            .await
            .unwrap();

        assert!(!user.has_usable_password());
        assert_eq!(user.registration_method, RegistrationMethod::Google);
    }

    #[tokio::test]
    async fn duplicate_email_maps_to_user_already_exists() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom(
                "duplicate key value violates unique constraint \"idx_users_email_lower\""
                    .to_string(),
            )])
            .into_connection();

        let result = UserRepositoryPostgres::new(Arc::new(db))
            .create_user(create_data())
            .await;

        assert_eq!(result.unwrap_err(), UserRepositoryError::UserAlreadyExists);
    }

    #[tokio::test]
    async fn other_insert_failures_are_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection timeout".to_string())])
            .into_connection();

        let result = UserRepositoryPostgres::new(Arc::new(db))
            .create_user(create_data())
            .await;

        match result.unwrap_err() {
            UserRepositoryError::DatabaseError(msg) => assert!(msg.contains("connection timeout")),
            other => panic!("expected DatabaseError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_profile_writes_given_fields() {
        let user_id = Uuid::new_v4();
        let before = user_model(user_id, "ada@example.com");
        let mut after = before.clone();
        after.first_name = "Augusta".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![before]])
            .append_query_results(vec![vec![after]])
            .into_connection();

        let user = UserRepositoryPostgres::new(Arc::new(db))
            .update_profile(
                user_id,
                UpdateProfileData {
                    first_name: Some("Augusta".to_string()),
                    last_name: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(user.first_name, "Augusta");
        assert_eq!(user.last_name, "Lovelace");
    }

    #[tokio::test]
    async fn empty_profile_update_skips_the_write() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_model(user_id, "ada@example.com")]])
            .into_connection();

        let user = UserRepositoryPostgres::new(Arc::new(db))
            .update_profile(user_id, UpdateProfileData::default())
            .await
            .unwrap();

        assert_eq!(user.first_name, "Ada");
    }

    #[tokio::test]
    async fn update_profile_for_missing_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<UserModel>::new()])
            .into_connection();

        let result = UserRepositoryPostgres::new(Arc::new(db))
            .update_profile(
                Uuid::new_v4(),
                UpdateProfileData {
                    first_name: Some("X".into()),
                    last_name: None,
                },
            )
            .await;

        assert_eq!(result.unwrap_err(), UserRepositoryError::UserNotFound);
    }

    #[tokio::test]
    async fn set_avatar_stores_the_path() {
        let user_id = Uuid::new_v4();
        let before = user_model(user_id, "ada@example.com");
        let mut after = before.clone();
        after.avatar_path = Some("avatars/ada.png".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![before]])
            .append_query_results(vec![vec![after]])
            .into_connection();

        let user = UserRepositoryPostgres::new(Arc::new(db))
            .set_avatar(user_id, Some("avatars/ada.png".to_string()))
            .await
            .unwrap();

        assert_eq!(user.avatar_path.as_deref(), Some("avatars/ada.png"));
    }

    #[test]
    fn unique_violation_detection() {
        assert!(is_unique_violation(&DbErr::Custom(
            "error returned from database: 23505".into()
        )));
        assert!(!is_unique_violation(&DbErr::Custom("timeout".into())));
    }
}
