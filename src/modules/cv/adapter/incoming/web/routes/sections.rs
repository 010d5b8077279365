//! The six section endpoints share one set of handlers, instantiated per
//! kind and mounted with [`configure`].
use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::Value;
use tracing::error;
use uuid::Uuid;

use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::cv::application::use_cases::manage_section::{SectionError, SectionUseCases};
use crate::cv::application::CvUseCases;
use crate::cv::domain::sections::{
    parse_payload, ContactSection, EducationSection, ExperienceSection, InterestSection,
    LanguageSection, SectionKind, SkillSection,
};
use crate::shared::api::{invalid_page, paginated, ApiResponse, PageQuery};
use crate::shared::validation::ValidationErrors;
use crate::AppState;

/// Where a section kind is mounted and which use cases serve it.
pub trait SectionRoute: SectionKind + Sized + 'static {
    const PATH: &'static str;

    fn use_cases(cv: &CvUseCases) -> &Arc<dyn SectionUseCases<Self>>;
}

impl SectionRoute for ContactSection {
    const PATH: &'static str = "/api/contacts";

    fn use_cases(cv: &CvUseCases) -> &Arc<dyn SectionUseCases<Self>> {
        &cv.contacts
    }
}

impl SectionRoute for ExperienceSection {
    const PATH: &'static str = "/api/experiences";

    fn use_cases(cv: &CvUseCases) -> &Arc<dyn SectionUseCases<Self>> {
        &cv.experiences
    }
}

impl SectionRoute for EducationSection {
    const PATH: &'static str = "/api/educations";

    fn use_cases(cv: &CvUseCases) -> &Arc<dyn SectionUseCases<Self>> {
        &cv.educations
    }
}

impl SectionRoute for SkillSection {
    const PATH: &'static str = "/api/skills";

    fn use_cases(cv: &CvUseCases) -> &Arc<dyn SectionUseCases<Self>> {
        &cv.skills
    }
}

impl SectionRoute for LanguageSection {
    const PATH: &'static str = "/api/languages";

    fn use_cases(cv: &CvUseCases) -> &Arc<dyn SectionUseCases<Self>> {
        &cv.languages
    }
}

impl SectionRoute for InterestSection {
    const PATH: &'static str = "/api/interests";

    fn use_cases(cv: &CvUseCases) -> &Arc<dyn SectionUseCases<Self>> {
        &cv.interests
    }
}

fn section_error<S: SectionRoute>(user: &AuthenticatedUser, e: SectionError) -> HttpResponse {
    match e {
        SectionError::Validation(errors) => ApiResponse::validation_error(errors),
        SectionError::CvNotFound => ApiResponse::not_found("CV_NOT_FOUND", "CV not found"),
        SectionError::NotFound => ApiResponse::not_found("SECTION_NOT_FOUND", "Not found"),
        SectionError::Forbidden => ApiResponse::forbidden(
            "FORBIDDEN",
            "You do not have permission to modify this CV",
        ),
        SectionError::Duplicate(message) => ApiResponse::bad_request("DUPLICATE_SECTION", message),
        SectionError::RepositoryError(msg) => {
            error!(user_id = %user.user_id, section = S::LABEL, error = %msg, "Section storage failure");
            ApiResponse::internal_error()
        }
    }
}

async fn list_sections<S: SectionRoute>(
    req: HttpRequest,
    user: AuthenticatedUser,
    query: web::Query<PageQuery>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let Some(page) = query.request() else {
        return invalid_page();
    };
    match S::use_cases(&data.cv).list(user.id(), page).await {
        Ok(records) => paginated(&req, records),
        Err(e) => section_error::<S>(&user, e),
    }
}

async fn create_section<S: SectionRoute>(
    user: AuthenticatedUser,
    body: web::Json<Value>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let payload = match parse_payload::<S>(body.into_inner()) {
        Ok(payload) => payload,
        Err(errors) => return ApiResponse::validation_error(errors),
    };

    match S::use_cases(&data.cv).create(user.id(), payload).await {
        Ok(record) => ApiResponse::created(record),
        Err(e) => section_error::<S>(&user, e),
    }
}

async fn get_section<S: SectionRoute>(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> HttpResponse {
    match S::use_cases(&data.cv).get(user.id(), path.into_inner()).await {
        Ok(record) => ApiResponse::success(record),
        Err(e) => section_error::<S>(&user, e),
    }
}

async fn put_section<S: SectionRoute>(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<Value>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let payload = match parse_payload::<S>(body.into_inner()) {
        Ok(payload) => payload,
        Err(errors) => return ApiResponse::validation_error(errors),
    };

    match S::use_cases(&data.cv)
        .update(user.id(), path.into_inner(), payload)
        .await
    {
        Ok(record) => ApiResponse::success(record),
        Err(e) => section_error::<S>(&user, e),
    }
}

async fn patch_section<S: SectionRoute>(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<Value>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let Value::Object(patch) = body.into_inner() else {
        return ApiResponse::validation_error(ValidationErrors::single(
            "non_field_errors",
            format!("Invalid {}: expected an object", S::LABEL),
        ));
    };

    match S::use_cases(&data.cv)
        .patch(user.id(), path.into_inner(), patch)
        .await
    {
        Ok(record) => ApiResponse::success(record),
        Err(e) => section_error::<S>(&user, e),
    }
}

async fn delete_section<S: SectionRoute>(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> HttpResponse {
    match S::use_cases(&data.cv).delete(user.id(), path.into_inner()).await {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => section_error::<S>(&user, e),
    }
}

/// Mounts list/create on `S::PATH` and retrieve/update/delete on `S::PATH/{id}`.
pub fn configure_section<S: SectionRoute>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(S::PATH)
            .route(web::get().to(list_sections::<S>))
            .route(web::post().to(create_section::<S>)),
    )
    .service(
        web::resource(format!("{}/{{id}}", S::PATH))
            .route(web::get().to(get_section::<S>))
            .route(web::put().to(put_section::<S>))
            .route(web::patch().to(patch_section::<S>))
            .route(web::delete().to(delete_section::<S>)),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    configure_section::<ContactSection>(cfg);
    configure_section::<ExperienceSection>(cfg);
    configure_section::<EducationSection>(cfg);
    configure_section::<SkillSection>(cfg);
    configure_section::<LanguageSection>(cfg);
    configure_section::<InterestSection>(cfg);
}
