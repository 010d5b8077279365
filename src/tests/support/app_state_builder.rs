use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;

use super::auth_fakes::{
    test_jwt, FakeHasher, InMemoryAvatarStorage, InMemoryTokenRepository, InMemoryUsers,
    StubGoogleVerifier,
};
use super::cv_fakes::InMemoryCvStore;
use crate::auth::application::ports::outgoing::{AvatarStorage, TokenProvider};
use crate::auth::application::services::password::DefaultPasswordPolicy;
use crate::auth::application::services::user_profile::{
    FetchProfileService, UpdateProfileService, UploadAvatarService,
};
use crate::auth::application::use_cases::google_auth::GoogleAuthUseCase;
use crate::auth::application::use_cases::login_user::LoginUserUseCase;
use crate::auth::application::use_cases::logout_user::LogoutUseCase;
use crate::auth::application::use_cases::refresh_token::RefreshTokenUseCase;
use crate::auth::application::use_cases::register_user::RegisterUserUseCase;
use crate::cv::application::services::{CvService, SectionService};
use crate::cv::application::CvUseCases;
use crate::cv::domain::sections::{
    ContactSection, EducationSection, ExperienceSection, InterestSection, LanguageSection,
    SkillSection,
};
use crate::shared::rate_limit::{RateLimitDecision, RateLimitError, RateLimiter, Throttle};
use crate::AppState;

const TEST_AVATAR_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Lets every request through, or none when `limited`.
struct FixedRateLimiter {
    limited: bool,
}

#[async_trait]
impl RateLimiter for FixedRateLimiter {
    async fn hit(&self, _scope: &str, _client: &str) -> Result<RateLimitDecision, RateLimitError> {
        if self.limited {
            Ok(RateLimitDecision::Limited {
                retry_after_secs: 60,
            })
        } else {
            Ok(RateLimitDecision::Allowed)
        }
    }
}

/// Builds an `AppState` whose use cases run for real over in-memory ports.
pub struct TestAppStateBuilder {
    users: InMemoryUsers,
    tokens: InMemoryTokenRepository,
    google: StubGoogleVerifier,
    avatars: InMemoryAvatarStorage,
    cv_store: InMemoryCvStore,
    rate_limiter: Arc<dyn RateLimiter + Send + Sync>,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            users: InMemoryUsers::new(),
            tokens: InMemoryTokenRepository::new(),
            google: StubGoogleVerifier::new(),
            avatars: InMemoryAvatarStorage::new(),
            cv_store: InMemoryCvStore::new(),
            rate_limiter: Arc::new(FixedRateLimiter { limited: false }),
        }
    }
}

impl TestAppStateBuilder {
    pub fn with_users(mut self, users: InMemoryUsers) -> Self {
        self.users = users;
        self
    }

    pub fn with_token_repository(mut self, tokens: InMemoryTokenRepository) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_google_verifier(mut self, verifier: StubGoogleVerifier) -> Self {
        self.google = verifier;
        self
    }

    pub fn with_avatar_storage(mut self, storage: InMemoryAvatarStorage) -> Self {
        self.avatars = storage;
        self
    }

    pub fn with_cv_store(mut self, store: InMemoryCvStore) -> Self {
        self.cv_store = store;
        self
    }

    /// Every rate-limited endpoint answers 429.
    pub fn throttled(self) -> Self {
        self.with_rate_limiter(Arc::new(FixedRateLimiter { limited: true }))
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter + Send + Sync>) -> Self {
        self.rate_limiter = limiter;
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        let tokens: Arc<dyn TokenProvider> = Arc::new(test_jwt());
        let hasher = Arc::new(FakeHasher);
        let avatars: Arc<dyn AvatarStorage> = Arc::new(self.avatars);
        let store = self.cv_store;

        web::Data::new(AppState {
            register_user_use_case: Arc::new(RegisterUserUseCase::new(
                self.users.clone(),
                self.users.clone(),
                hasher.clone(),
                Arc::new(DefaultPasswordPolicy::default()),
                tokens.clone(),
            )),
            login_user_use_case: Arc::new(LoginUserUseCase::new(
                self.users.clone(),
                hasher,
                tokens.clone(),
            )),
            refresh_token_use_case: Arc::new(RefreshTokenUseCase::new(
                self.users.clone(),
                self.tokens.clone(),
                tokens.clone(),
            )),
            logout_user_use_case: Arc::new(LogoutUseCase::new(self.tokens, tokens.clone())),
            google_auth_use_case: Arc::new(GoogleAuthUseCase::new(
                self.users.clone(),
                self.users.clone(),
                Arc::new(self.google),
                tokens,
            )),
            fetch_profile_use_case: Arc::new(FetchProfileService::new(self.users.clone())),
            update_profile_use_case: Arc::new(UpdateProfileService::new(self.users.clone())),
            upload_avatar_use_case: Arc::new(UploadAvatarService::new(
                self.users.clone(),
                self.users,
                avatars,
            )),
            cv: CvUseCases {
                cvs: Arc::new(CvService::new(store.clone())),
                contacts: Arc::new(SectionService::<ContactSection, _>::new(store.clone())),
                experiences: Arc::new(SectionService::<ExperienceSection, _>::new(store.clone())),
                educations: Arc::new(SectionService::<EducationSection, _>::new(store.clone())),
                skills: Arc::new(SectionService::<SkillSection, _>::new(store.clone())),
                languages: Arc::new(SectionService::<LanguageSection, _>::new(store.clone())),
                interests: Arc::new(SectionService::<InterestSection, _>::new(store)),
            },
            throttle: Throttle::new(self.rate_limiter, Vec::new()),
            media_url: "/media".to_string(),
            avatar_max_bytes: TEST_AVATAR_MAX_BYTES,
        })
    }
}
