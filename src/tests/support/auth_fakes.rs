//! In-memory implementations of the auth outgoing ports.
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::auth::application::domain::entities::{RegistrationMethod, User};
use crate::auth::application::ports::outgoing::{
    AvatarStorage, AvatarStorageError, CreateUserData, GoogleIdentity, GoogleTokenError,
    GoogleTokenVerifier, HashError, PasswordHasher, TokenRepository, TokenRepositoryError,
    UpdateProfileData, UserQuery, UserQueryError, UserRepository, UserRepositoryError,
};

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_purposes_only";

pub fn test_jwt() -> JwtTokenService {
    JwtTokenService::new(JwtConfig {
        secret_key: TEST_JWT_SECRET.to_string(),
        issuer: "cv-builder-test".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 86400,
    })
}

pub fn sample_user(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        password_hash: Some(FakeHasher::digest("Analytical-Engine-1843")),
        registration_method: RegistrationMethod::Email,
        is_premium: false,
        is_active: true,
        is_staff: false,
        avatar_path: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Users table. Implements both the query and the repository port.
#[derive(Clone, Default)]
pub struct InMemoryUsers {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        self.users.lock().unwrap().insert(user.id, user);
        self
    }

    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl UserQuery for InMemoryUsers {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserQueryError> {
        Ok(self.get(user_id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserQueryError> {
        let email = email.trim().to_lowercase();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create_user(&self, data: CreateUserData) -> Result<User, UserRepositoryError> {
        let mut users = self.users.lock().unwrap();
        let email = data.email.to_lowercase();
        if users.values().any(|u| u.email.to_lowercase() == email) {
            return Err(UserRepositoryError::UserAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            password_hash: data.password_hash,
            registration_method: data.registration_method,
            is_premium: false,
            is_active: true,
            is_staff: false,
            avatar_path: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        data: UpdateProfileData,
    ) -> Result<User, UserRepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&user_id)
            .ok_or(UserRepositoryError::UserNotFound)?;
        if let Some(first_name) = data.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = data.last_name {
            user.last_name = last_name;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_avatar(
        &self,
        user_id: Uuid,
        avatar_path: Option<String>,
    ) -> Result<User, UserRepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&user_id)
            .ok_or(UserRepositoryError::UserNotFound)?;
        user.avatar_path = avatar_path;
        Ok(user.clone())
    }
}

/// Not a real KDF: `hashed:<password>`.
#[derive(Clone, Default)]
pub struct FakeHasher;

impl FakeHasher {
    pub fn digest(password: &str) -> String {
        format!("hashed:{password}")
    }
}

#[async_trait]
impl PasswordHasher for FakeHasher {
    async fn hash_password(&self, password: &str) -> Result<String, HashError> {
        Ok(Self::digest(password))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        Ok(Self::digest(password) == hash)
    }
}

/// Every call yields once before touching the set, the way a round trip to
/// Redis would, so concurrent callers interleave.
#[derive(Clone, Default)]
pub struct InMemoryTokenRepository {
    hashes: Arc<Mutex<HashSet<String>>>,
    pub fail: bool,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn contains(&self, token_hash: &str) -> bool {
        self.hashes.lock().unwrap().contains(token_hash)
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn blacklist_token(
        &self,
        token_hash: String,
        _user_id: Uuid,
        _expires_at: DateTime<Utc>,
    ) -> Result<(), TokenRepositoryError> {
        tokio::task::yield_now().await;
        if self.fail {
            return Err(TokenRepositoryError::DatabaseError("redis down".into()));
        }
        self.hashes.lock().unwrap().insert(token_hash);
        Ok(())
    }

    async fn blacklist_if_absent(
        &self,
        token_hash: String,
        _user_id: Uuid,
        _expires_at: DateTime<Utc>,
    ) -> Result<bool, TokenRepositoryError> {
        tokio::task::yield_now().await;
        if self.fail {
            return Err(TokenRepositoryError::DatabaseError("redis down".into()));
        }
        Ok(self.hashes.lock().unwrap().insert(token_hash))
    }

    async fn is_token_blacklisted(&self, token_hash: &str) -> Result<bool, TokenRepositoryError> {
        tokio::task::yield_now().await;
        if self.fail {
            return Err(TokenRepositoryError::DatabaseError("redis down".into()));
        }
        Ok(self.contains(token_hash))
    }
}

/// Accepts exactly the tokens it was seeded with.
#[derive(Clone, Default)]
pub struct StubGoogleVerifier {
    identities: HashMap<String, GoogleIdentity>,
    transport_down: bool,
}

impl StubGoogleVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, token: &str, identity: GoogleIdentity) -> Self {
        self.identities.insert(token.to_string(), identity);
        self
    }

    pub fn unreachable() -> Self {
        Self {
            transport_down: true,
            ..Self::default()
        }
    }
}

pub fn google_identity(email: &str) -> GoogleIdentity {
    GoogleIdentity {
        subject: "109876543210".to_string(),
        email: Some(email.to_string()),
        email_verified: true,
        given_name: Some("Grace".to_string()),
        family_name: Some("Hopper".to_string()),
    }
}

#[async_trait]
impl GoogleTokenVerifier for StubGoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, GoogleTokenError> {
        if self.transport_down {
            return Err(GoogleTokenError::Transport("connection refused".into()));
        }
        self.identities
            .get(id_token)
            .cloned()
            .ok_or_else(|| GoogleTokenError::InvalidToken("unknown token".into()))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAvatarStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryAvatarStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.files.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl AvatarStorage for InMemoryAvatarStorage {
    async fn store(
        &self,
        user_id: Uuid,
        extension: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AvatarStorageError> {
        let path = format!("avatars/{}-{}.{}", user_id, Uuid::new_v4().simple(), extension);
        self.files.lock().unwrap().insert(path.clone(), bytes);
        Ok(path)
    }

    async fn remove(&self, path: &str) -> Result<(), AvatarStorageError> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }
}
