use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::dto::AuthSessionDto;
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::use_cases::google_auth::{GoogleAuthError, GoogleAuthRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct GoogleAuthRequestDto {
    /// ID token returned by Google Identity Services
    #[schema(example = "eyJhbGciOiJSUzI1NiIsImtpZCI6Ij...")]
    pub id_token: Option<String>,
}

/// Sign in with Google
///
/// Verifies a Google ID token. The first sign-in creates the account.
#[utoipa::path(
    post,
    path = "/api/users/google-auth",
    tag = "auth",
    request_body = GoogleAuthRequestDto,
    responses(
        (status = 200, description = "Signed in", body = inline(SuccessResponse<AuthSessionDto>)),
        (status = 400, description = "ID token missing", body = ErrorResponse),
        (status = 401, description = "ID token rejected", body = ErrorResponse),
        (
            status = 403,
            description = "Email already registered with a password",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "ACCOUNT_EXISTS_WITH_PASSWORD",
                    "message": "An account with this email already exists. Please log in with your password."
                }
            })
        ),
        (status = 429, description = "Too many attempts", body = ErrorResponse),
        (status = 500, description = "Google keys unreachable or internal error", body = ErrorResponse)
    )
)]
#[post("/api/users/google-auth")]
pub async fn google_auth_handler(
    req: HttpRequest,
    payload: web::Json<GoogleAuthRequestDto>,
    data: web::Data<AppState>,
) -> HttpResponse {
    if let Err(throttled) = data.throttle.enforce("google-auth", &req).await {
        return throttled;
    }

    let request = match GoogleAuthRequest::new(payload.into_inner().id_token) {
        Ok(request) => request,
        Err(errors) => return ApiResponse::validation_error(errors),
    };

    match data.google_auth_use_case.execute(request).await {
        Ok(session) => {
            info!(user_id = %session.user.id, "Google sign-in");
            ApiResponse::success(AuthSessionDto::new(session, &data.media_url))
        }
        Err(e @ GoogleAuthError::InvalidToken(_)) | Err(e @ GoogleAuthError::EmailNotVerified) => {
            warn!(error = %e, "Google token rejected");
            ApiResponse::unauthorized("INVALID_TOKEN", &e.to_string())
        }
        Err(e @ GoogleAuthError::AccountExistsWithPassword) => {
            ApiResponse::forbidden("ACCOUNT_EXISTS_WITH_PASSWORD", &e.to_string())
        }
        Err(e @ GoogleAuthError::AccountInactive) => {
            ApiResponse::forbidden("ACCOUNT_INACTIVE", &e.to_string())
        }
        Err(e @ GoogleAuthError::Upstream(_))
        | Err(e @ GoogleAuthError::RepositoryError(_))
        | Err(e @ GoogleAuthError::TokenGenerationFailed(_)) => {
            error!(error = %e, "Google sign-in failed");
            ApiResponse::internal_error()
        }
    }
}
