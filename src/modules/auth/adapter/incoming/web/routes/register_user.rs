use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::dto::AuthSessionDto;
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::use_cases::register_user::{RegisterUserError, RegisterUserRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Request body for email registration
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterUserDto {
    #[schema(example = "ada@example.com")]
    pub email: String,

    #[schema(example = "Analytical-Engine-1843")]
    pub password: String,

    /// Must repeat `password`
    #[schema(example = "Analytical-Engine-1843")]
    pub password2: String,

    #[schema(example = "Ada")]
    pub first_name: String,

    #[schema(example = "Lovelace")]
    pub last_name: String,
}

/// Register with email and password
///
/// Creates the account and signs it in straight away.
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "auth",
    request_body = RegisterUserDto,
    responses(
        (status = 201, description = "Account created", body = inline(SuccessResponse<AuthSessionDto>)),
        (
            status = 400,
            description = "Invalid input, weak password or email already registered",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "email: A user with that email already exists.",
                    "fields": { "email": ["A user with that email already exists."] }
                }
            })
        ),
        (status = 429, description = "Too many attempts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[post("/api/users/register")]
pub async fn register_user_handler(
    req: HttpRequest,
    payload: web::Json<RegisterUserDto>,
    data: web::Data<AppState>,
) -> HttpResponse {
    if let Err(throttled) = data.throttle.enforce("register", &req).await {
        return throttled;
    }

    let payload = payload.into_inner();
    info!(email = %payload.email, "Registration attempt");

    let request = match RegisterUserRequest::new(
        payload.email,
        payload.password,
        payload.password2,
        payload.first_name,
        payload.last_name,
    ) {
        Ok(request) => request,
        Err(errors) => {
            warn!(error = %errors, "Invalid registration input");
            return ApiResponse::validation_error(errors);
        }
    };

    match data.register_user_use_case.execute(request).await {
        Ok(session) => ApiResponse::created(AuthSessionDto::new(session, &data.media_url)),
        Err(RegisterUserError::Validation(errors)) => {
            warn!(error = %errors, "Registration rejected");
            ApiResponse::validation_error(errors)
        }
        Err(e @ RegisterUserError::HashingFailed(_))
        | Err(e @ RegisterUserError::TokenGenerationFailed(_))
        | Err(e @ RegisterUserError::RepositoryError(_)) => {
            error!(error = %e, "Registration failed");
            ApiResponse::internal_error()
        }
    }
}
