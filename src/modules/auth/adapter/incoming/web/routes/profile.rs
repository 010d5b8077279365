use actix_multipart::Multipart;
use actix_web::{get, patch, put, web, HttpResponse};
use futures::TryStreamExt;
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::dto::UserDto;
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::auth::application::use_cases::fetch_profile::FetchProfileError;
use crate::auth::application::use_cases::update_profile::{UpdateProfileError, UpdateProfileInput};
use crate::auth::application::use_cases::upload_avatar::{AvatarUpload, UploadAvatarError};
use crate::shared::api::ApiResponse;
use crate::AppState;

const AVATAR_FIELD: &str = "avatar";

/// Editable profile fields. Email, flags and join date are read-only and
/// ignored when sent.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateProfileDto {
    #[schema(example = "Ada")]
    pub first_name: Option<String>,

    #[schema(example = "King")]
    pub last_name: Option<String>,
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Profile", body = inline(SuccessResponse<UserDto>)),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/users/me")]
pub async fn get_profile_handler(user: AuthenticatedUser, data: web::Data<AppState>) -> HttpResponse {
    match data.fetch_profile_use_case.execute(user.id()).await {
        Ok(profile) => ApiResponse::success(UserDto::from_user(&profile, &data.media_url)),
        Err(FetchProfileError::UserNotFound(id)) => {
            warn!(user_id = %id, "Token for a missing user");
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }
        Err(e @ FetchProfileError::QueryError(_)) => {
            error!(user_id = %user.user_id, error = %e, "Failed to load profile");
            ApiResponse::internal_error()
        }
    }
}

/// Update the current user's names
///
/// PUT and PATCH behave the same: absent fields are left unchanged.
#[utoipa::path(
    patch,
    path = "/api/users/me",
    tag = "users",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated profile", body = inline(SuccessResponse<UserDto>)),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[patch("/api/users/me")]
pub async fn patch_profile_handler(
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileDto>,
    data: web::Data<AppState>,
) -> HttpResponse {
    update_profile(user, payload.into_inner(), &data).await
}

#[put("/api/users/me")]
pub async fn put_profile_handler(
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileDto>,
    data: web::Data<AppState>,
) -> HttpResponse {
    update_profile(user, payload.into_inner(), &data).await
}

async fn update_profile(
    user: AuthenticatedUser,
    payload: UpdateProfileDto,
    data: &AppState,
) -> HttpResponse {
    let input = match UpdateProfileInput::new(payload.first_name, payload.last_name) {
        Ok(input) => input,
        Err(errors) => return ApiResponse::validation_error(errors),
    };

    match data.update_profile_use_case.execute(user.id(), input).await {
        Ok(profile) => {
            info!(user_id = %user.user_id, "Profile updated");
            ApiResponse::success(UserDto::from_user(&profile, &data.media_url))
        }
        Err(UpdateProfileError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }
        Err(e @ UpdateProfileError::RepositoryError(_)) => {
            error!(user_id = %user.user_id, error = %e, "Failed to update profile");
            ApiResponse::internal_error()
        }
    }
}

/// Upload a new avatar
///
/// Multipart form with a single image in the `avatar` field.
#[utoipa::path(
    patch,
    path = "/api/users/me/avatar",
    tag = "users",
    request_body(content_type = "multipart/form-data", description = "Image in the `avatar` field"),
    responses(
        (status = 200, description = "Updated profile", body = inline(SuccessResponse<UserDto>)),
        (status = 400, description = "Missing, oversized or non-image file", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[patch("/api/users/me/avatar")]
pub async fn upload_avatar_handler(
    user: AuthenticatedUser,
    payload: Multipart,
    data: web::Data<AppState>,
) -> HttpResponse {
    let bytes = match read_avatar_field(payload, data.avatar_max_bytes).await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };

    let upload = match AvatarUpload::new(bytes, data.avatar_max_bytes) {
        Ok(upload) => upload,
        Err(e) => {
            warn!(user_id = %user.user_id, error = %e, "Avatar rejected");
            return ApiResponse::field_error(AVATAR_FIELD, &e.to_string());
        }
    };

    match data.upload_avatar_use_case.execute(user.id(), upload).await {
        Ok(profile) => ApiResponse::success(UserDto::from_user(&profile, &data.media_url)),
        Err(UploadAvatarError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }
        Err(e @ UploadAvatarError::Storage(_)) | Err(e @ UploadAvatarError::RepositoryError(_)) => {
            error!(user_id = %user.user_id, error = %e, "Avatar upload failed");
            ApiResponse::internal_error()
        }
    }
}

/// Reads the `avatar` part, stopping one byte past the limit so oversized
/// files are rejected without buffering them whole.
async fn read_avatar_field(mut payload: Multipart, max_bytes: usize) -> Result<Vec<u8>, HttpResponse> {
    let malformed = |e: actix_multipart::MultipartError| {
        warn!(error = %e, "Malformed multipart body");
        ApiResponse::bad_request("VALIDATION_ERROR", "Malformed multipart body")
    };

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            bytes.extend_from_slice(&chunk);
            if bytes.len() > max_bytes {
                break;
            }
        }
        return Ok(bytes);
    }

    Err(ApiResponse::field_error(AVATAR_FIELD, "No file was submitted."))
}
