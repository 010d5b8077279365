use actix_web::{delete, get, patch, post, put, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::cv::application::use_cases::manage_cv::{CvError, CvInput};
use crate::cv::domain::entities::CvDocument;
use crate::shared::api::{invalid_page, paginated, ApiResponse, PageDto, PageQuery};
use crate::AppState;

/// Body for creating or updating a CV. Every field is optional; on update,
/// absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CvRequestDto {
    #[schema(example = "Backend Engineer CV")]
    pub title: Option<String>,

    /// `null` clears the summary
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>, example = "Ten years of distributed systems.")]
    pub summary: Option<Option<String>>,

    /// Contact fields, merged into the stored contact on update
    #[schema(value_type = Option<Object>, example = json!({ "email": "ada@example.com", "city": "London" }))]
    pub contact: Option<Map<String, Value>>,
}

/// Tells an explicit `null` apart from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<CvRequestDto> for CvInput {
    fn from(dto: CvRequestDto) -> Self {
        CvInput {
            title: dto.title,
            summary: dto.summary,
            contact: dto.contact,
        }
    }
}

fn cv_error(user: &AuthenticatedUser, e: CvError) -> HttpResponse {
    match e {
        CvError::Validation(errors) => ApiResponse::validation_error(errors),
        CvError::NotFound => ApiResponse::not_found("CV_NOT_FOUND", "CV not found"),
        CvError::TitleTaken => {
            ApiResponse::bad_request("CV_TITLE_TAKEN", "You already have a CV with this title")
        }
        CvError::RepositoryError(msg) => {
            error!(user_id = %user.user_id, error = %msg, "CV storage failure");
            ApiResponse::internal_error()
        }
    }
}

/// List the caller's CVs
///
/// Most recently updated first, every section included, 20 per page.
#[utoipa::path(
    get,
    path = "/api/cvs",
    tag = "cvs",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of CVs", body = inline(SuccessResponse<PageDto<CvDocument>>)),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Invalid page", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/cvs")]
pub async fn list_cvs_handler(
    req: HttpRequest,
    user: AuthenticatedUser,
    query: web::Query<PageQuery>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let Some(page) = query.request() else {
        return invalid_page();
    };
    match data.cv.cvs.list(user.id(), page).await {
        Ok(cvs) => paginated(&req, cvs),
        Err(e) => cv_error(&user, e),
    }
}

/// Create a CV
///
/// The title defaults to "My Professional CV". A nested `contact` is
/// created in the same transaction.
#[utoipa::path(
    post,
    path = "/api/cvs",
    tag = "cvs",
    request_body = CvRequestDto,
    responses(
        (status = 201, description = "Created CV", body = inline(SuccessResponse<CvDocument>)),
        (status = 400, description = "Invalid input or duplicate title", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/api/cvs")]
pub async fn create_cv_handler(
    user: AuthenticatedUser,
    payload: web::Json<CvRequestDto>,
    data: web::Data<AppState>,
) -> HttpResponse {
    match data.cv.cvs.create(user.id(), payload.into_inner().into()).await {
        Ok(cv) => ApiResponse::created(cv),
        Err(e) => cv_error(&user, e),
    }
}

/// Fetch one CV
#[utoipa::path(
    get,
    path = "/api/cvs/{id}",
    tag = "cvs",
    params(("id" = Uuid, Path, description = "CV id")),
    responses(
        (status = 200, description = "CV", body = inline(SuccessResponse<CvDocument>)),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "No such CV for this user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/cvs/{id}")]
pub async fn get_cv_handler(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> HttpResponse {
    match data.cv.cvs.get(user.id(), path.into_inner()).await {
        Ok(cv) => ApiResponse::success(cv),
        Err(e) => cv_error(&user, e),
    }
}

/// Update a CV
///
/// PUT and PATCH both merge: absent fields are left unchanged.
#[utoipa::path(
    patch,
    path = "/api/cvs/{id}",
    tag = "cvs",
    params(("id" = Uuid, Path, description = "CV id")),
    request_body = CvRequestDto,
    responses(
        (status = 200, description = "Updated CV", body = inline(SuccessResponse<CvDocument>)),
        (status = 400, description = "Invalid input or duplicate title", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "No such CV for this user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[patch("/api/cvs/{id}")]
pub async fn patch_cv_handler(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<CvRequestDto>,
    data: web::Data<AppState>,
) -> HttpResponse {
    update_cv(user, path.into_inner(), payload.into_inner(), &data).await
}

#[put("/api/cvs/{id}")]
pub async fn put_cv_handler(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<CvRequestDto>,
    data: web::Data<AppState>,
) -> HttpResponse {
    update_cv(user, path.into_inner(), payload.into_inner(), &data).await
}

async fn update_cv(
    user: AuthenticatedUser,
    cv_id: Uuid,
    payload: CvRequestDto,
    data: &AppState,
) -> HttpResponse {
    match data.cv.cvs.update(user.id(), cv_id, payload.into()).await {
        Ok(cv) => ApiResponse::success(cv),
        Err(e) => cv_error(&user, e),
    }
}

/// Delete a CV and all of its sections
#[utoipa::path(
    delete,
    path = "/api/cvs/{id}",
    tag = "cvs",
    params(("id" = Uuid, Path, description = "CV id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "No such CV for this user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/api/cvs/{id}")]
pub async fn delete_cv_handler(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> HttpResponse {
    match data.cv.cvs.delete(user.id(), path.into_inner()).await {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => cv_error(&user, e),
    }
}
