use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::dto::AuthSessionDto;
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::use_cases::login_user::{LoginError, LoginRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Login request from client
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequestDto {
    #[schema(example = "ada@example.com")]
    pub email: String,

    #[schema(example = "Analytical-Engine-1843")]
    pub password: String,
}

/// User login
///
/// Authenticates a user with email and password, returns JWT access and refresh tokens.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = inline(SuccessResponse<AuthSessionDto>)),
        (status = 400, description = "Email or password missing", body = ErrorResponse),
        (
            status = 401,
            description = "Invalid credentials",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INVALID_CREDENTIALS",
                    "message": "No active account found with the given credentials"
                }
            })
        ),
        (status = 429, description = "Too many attempts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[post("/api/auth/login")]
pub async fn login_user_handler(
    req: HttpRequest,
    payload: web::Json<LoginRequestDto>,
    data: web::Data<AppState>,
) -> HttpResponse {
    if let Err(throttled) = data.throttle.enforce("login", &req).await {
        return throttled;
    }

    let payload = payload.into_inner();
    let request = match LoginRequest::new(payload.email, payload.password) {
        Ok(request) => request,
        Err(errors) => return ApiResponse::validation_error(errors),
    };
    info!(email = %request.email(), "Login attempt");

    match data.login_user_use_case.execute(request).await {
        Ok(session) => ApiResponse::success(AuthSessionDto::new(session, &data.media_url)),
        Err(e @ LoginError::InvalidCredentials) => {
            warn!("Invalid credentials");
            ApiResponse::unauthorized("INVALID_CREDENTIALS", &e.to_string())
        }
        Err(e @ LoginError::PasswordVerificationFailed(_))
        | Err(e @ LoginError::TokenGenerationFailed(_))
        | Err(e @ LoginError::QueryError(_)) => {
            error!(error = %e, "Login failed");
            ApiResponse::internal_error()
        }
    }
}
