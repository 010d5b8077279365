pub mod api;
pub mod health;
pub mod modules;
pub mod shared;
pub use modules::auth;
pub use modules::cv;

use crate::api::openapi::ApiDoc;
use crate::auth::adapter::outgoing::avatar_storage_local::LocalAvatarStorage;
use crate::auth::adapter::outgoing::google_id_token_verifier::GoogleIdTokenVerifier;
use crate::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::auth::adapter::outgoing::security::Argon2Hasher;
use crate::auth::adapter::outgoing::token_repository_redis::RedisTokenRepository;
use crate::auth::adapter::outgoing::user_query_postgres::UserQueryPostgres;
use crate::auth::adapter::outgoing::user_repository_postgres::UserRepositoryPostgres;
use crate::auth::application::ports::outgoing::TokenProvider;
use crate::auth::application::services::password::DefaultPasswordPolicy;
use crate::auth::application::services::user_profile::{
    FetchProfileService, UpdateProfileService, UploadAvatarService,
};
use crate::auth::application::use_cases::{
    fetch_profile::FetchProfileUseCase,
    google_auth::{GoogleAuthUseCase, IGoogleAuthUseCase},
    login_user::{ILoginUserUseCase, LoginUserUseCase},
    logout_user::{ILogoutUseCase, LogoutUseCase},
    refresh_token::{IRefreshTokenUseCase, RefreshTokenUseCase},
    register_user::{IRegisterUserUseCase, RegisterUserUseCase},
    update_profile::UpdateProfileUseCase,
    upload_avatar::UploadAvatarUseCase,
};
use crate::cv::adapter::outgoing::{CvRepoPostgres, SectionRepoPostgres};
use crate::cv::application::services::{CvService, SectionService};
use crate::cv::application::CvUseCases;
use crate::cv::domain::sections::{
    ContactSection, EducationSection, ExperienceSection, InterestSection, LanguageSection,
    SkillSection,
};
use crate::shared::api::custom_json_config;
use crate::shared::config::{load_env_files, AppConfig};
use crate::shared::rate_limit::{throttle_requests, RedisRateLimiter, Throttle};

use actix_cors::Cors;
use actix_web::{http::header, middleware::from_fn, web, App, HttpServer};
use anyhow::Context;
use deadpool_redis::{Config, Runtime};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub register_user_use_case: Arc<dyn IRegisterUserUseCase + Send + Sync>,
    pub login_user_use_case: Arc<dyn ILoginUserUseCase + Send + Sync>,
    pub refresh_token_use_case: Arc<dyn IRefreshTokenUseCase + Send + Sync>,
    pub logout_user_use_case: Arc<dyn ILogoutUseCase + Send + Sync>,
    pub google_auth_use_case: Arc<dyn IGoogleAuthUseCase + Send + Sync>,
    pub fetch_profile_use_case: Arc<dyn FetchProfileUseCase + Send + Sync>,
    pub update_profile_use_case: Arc<dyn UpdateProfileUseCase + Send + Sync>,
    pub upload_avatar_use_case: Arc<dyn UploadAvatarUseCase + Send + Sync>,
    pub cv: CvUseCases,
    pub throttle: Throttle,
    /// Public prefix avatar paths are joined to.
    pub media_url: String,
    pub avatar_max_bytes: usize,
}

fn cv_use_cases(db: &Arc<DatabaseConnection>) -> CvUseCases {
    CvUseCases {
        cvs: Arc::new(CvService::new(CvRepoPostgres::new(Arc::clone(db)))),
        contacts: Arc::new(SectionService::<ContactSection, _>::new(
            SectionRepoPostgres::new(Arc::clone(db)),
        )),
        experiences: Arc::new(SectionService::<ExperienceSection, _>::new(
            SectionRepoPostgres::new(Arc::clone(db)),
        )),
        educations: Arc::new(SectionService::<EducationSection, _>::new(
            SectionRepoPostgres::new(Arc::clone(db)),
        )),
        skills: Arc::new(SectionService::<SkillSection, _>::new(
            SectionRepoPostgres::new(Arc::clone(db)),
        )),
        languages: Arc::new(SectionService::<LanguageSection, _>::new(
            SectionRepoPostgres::new(Arc::clone(db)),
        )),
        interests: Arc::new(SectionService::<InterestSection, _>::new(
            SectionRepoPostgres::new(Arc::clone(db)),
        )),
    }
}

fn cors_for(config: &AppConfig) -> Cors {
    let cors = if config.is_production() || !config.cors_allowed_origins.is_empty() {
        config
            .cors_allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    } else {
        Cors::default().allow_any_origin()
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    load_env_files();
    let config = AppConfig::from_env().context("invalid configuration")?;
    let jwt_config = JwtConfig::from_env().context("invalid JWT configuration")?;

    // rediss:// URLs need a process-wide rustls provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    // Database connection
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(50)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let db_arc = Arc::new(
        Database::connect(opt)
            .await
            .context("failed to connect to database")?,
    );

    // Redis connection
    let redis_arc = Arc::new(
        Config::from_url(&config.redis_url)
            .create_pool(Some(Runtime::Tokio1))
            .context("failed to create Redis pool")?,
    );

    let jwt_service = JwtTokenService::new(jwt_config);
    let token_provider: Arc<dyn TokenProvider> = Arc::new(jwt_service.clone());
    let password_hasher = Arc::new(Argon2Hasher::from_env());

    let user_query = UserQueryPostgres::new(Arc::clone(&db_arc));
    let user_repo = UserRepositoryPostgres::new(Arc::clone(&db_arc));
    let token_repo = RedisTokenRepository::new(Arc::clone(&redis_arc));

    let state = AppState {
        register_user_use_case: Arc::new(RegisterUserUseCase::new(
            user_query.clone(),
            user_repo.clone(),
            password_hasher.clone(),
            Arc::new(DefaultPasswordPolicy::default()),
            token_provider.clone(),
        )),
        login_user_use_case: Arc::new(LoginUserUseCase::new(
            user_query.clone(),
            password_hasher,
            token_provider.clone(),
        )),
        refresh_token_use_case: Arc::new(RefreshTokenUseCase::new(
            user_query.clone(),
            token_repo.clone(),
            token_provider.clone(),
        )),
        logout_user_use_case: Arc::new(LogoutUseCase::new(token_repo, token_provider.clone())),
        google_auth_use_case: Arc::new(GoogleAuthUseCase::new(
            user_query.clone(),
            user_repo.clone(),
            Arc::new(GoogleIdTokenVerifier::new(config.google_client_id.clone())),
            token_provider,
        )),
        fetch_profile_use_case: Arc::new(FetchProfileService::new(user_query.clone())),
        update_profile_use_case: Arc::new(UpdateProfileService::new(user_repo.clone())),
        upload_avatar_use_case: Arc::new(UploadAvatarService::new(
            user_query,
            user_repo,
            Arc::new(LocalAvatarStorage::new(config.media_root.clone())),
        )),
        cv: cv_use_cases(&db_arc),
        throttle: Throttle::new(
            Arc::new(RedisRateLimiter::new(
                Arc::clone(&redis_arc),
                config.rate_limits,
            )),
            config.trusted_proxies.clone(),
        ),
        media_url: config.media_url.clone(),
        avatar_max_bytes: config.avatar_max_bytes,
    };

    let token_provider_arc: Arc<dyn TokenProvider + Send + Sync> = Arc::new(jwt_service);
    let server_url = config.server_url();
    info!(%server_url, environment = %config.environment, "Server listening");

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(throttle_requests))
            .wrap(cors_for(&config))
            .app_data(custom_json_config())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(Arc::clone(&token_provider_arc)))
            .app_data(web::Data::new(Arc::clone(&db_arc)))
            .app_data(web::Data::new(Arc::clone(&redis_arc)))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .configure(init_routes)
    })
    .bind(server_url)?
    .run()
    .await?;

    Ok(())
}

#[cfg(not(tarpaulin_include))]
fn init_routes(cfg: &mut web::ServiceConfig) {
    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // Auth
    cfg.service(crate::auth::adapter::incoming::web::routes::register_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::login_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::google_auth_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::refresh_token_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::logout_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::users_logout_handler);
    // Profile
    cfg.service(crate::auth::adapter::incoming::web::routes::get_profile_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::put_profile_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::patch_profile_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::upload_avatar_handler);
    // CV
    cfg.service(crate::cv::adapter::incoming::web::routes::list_cvs_handler);
    cfg.service(crate::cv::adapter::incoming::web::routes::create_cv_handler);
    cfg.service(crate::cv::adapter::incoming::web::routes::get_cv_handler);
    cfg.service(crate::cv::adapter::incoming::web::routes::put_cv_handler);
    cfg.service(crate::cv::adapter::incoming::web::routes::patch_cv_handler);
    cfg.service(crate::cv::adapter::incoming::web::routes::delete_cv_handler);
    // Sections
    crate::cv::adapter::incoming::web::routes::configure_sections(cfg);
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e:#}");
    }
}
