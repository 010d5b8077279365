use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::api::schemas::ErrorResponse;
use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::auth::application::use_cases::logout_user::{LogoutError, LogoutRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LogoutRequestDto {
    /// Refresh token to revoke
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh: Option<String>,
}

/// Log out
///
/// Blacklists the caller's refresh token until it would have expired and
/// answers 205 with an empty body. Also served at `/api/users/logout`.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    request_body = LogoutRequestDto,
    responses(
        (status = 205, description = "Refresh token revoked; the client should discard its tokens"),
        (
            status = 400,
            description = "Missing, invalid or foreign refresh token",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "INVALID_TOKEN", "message": "Invalid refresh token: Token has expired" }
            })
        ),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/api/auth/logout")]
pub async fn logout_user_handler(
    user: AuthenticatedUser,
    payload: web::Json<LogoutRequestDto>,
    data: web::Data<AppState>,
) -> HttpResponse {
    logout(user, payload.into_inner(), &data).await
}

#[post("/api/users/logout")]
pub async fn users_logout_handler(
    user: AuthenticatedUser,
    payload: web::Json<LogoutRequestDto>,
    data: web::Data<AppState>,
) -> HttpResponse {
    logout(user, payload.into_inner(), &data).await
}

async fn logout(user: AuthenticatedUser, payload: LogoutRequestDto, data: &AppState) -> HttpResponse {
    let request = match LogoutRequest::new(payload.refresh) {
        Ok(request) => request,
        Err(errors) => return ApiResponse::validation_error(errors),
    };

    match data
        .logout_user_use_case
        .execute(user.user_id, request)
        .await
    {
        Ok(()) => {
            info!(user_id = %user.user_id, "User logged out");
            ApiResponse::reset_content()
        }
        Err(e @ LogoutError::InvalidToken(_)) => {
            ApiResponse::bad_request("INVALID_TOKEN", &e.to_string())
        }
        Err(e @ LogoutError::TokenNotOwned) => {
            warn!(user_id = %user.user_id, "Logout with a foreign refresh token");
            ApiResponse::bad_request("INVALID_TOKEN", &e.to_string())
        }
        Err(e @ LogoutError::DatabaseError(_)) => {
            error!(user_id = %user.user_id, error = %e, "Logout failed");
            ApiResponse::internal_error()
        }
    }
}
