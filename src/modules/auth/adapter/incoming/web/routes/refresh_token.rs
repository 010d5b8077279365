use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use super::dto::TokenPairDto;
use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::use_cases::refresh_token::{RefreshTokenError, RefreshTokenRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RefreshTokenRequestDto {
    /// Refresh token from the last sign-in or refresh
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh: String,
}

/// Rotate the refresh token
///
/// The presented refresh token is blacklisted and a new pair is returned.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "auth",
    request_body = RefreshTokenRequestDto,
    responses(
        (status = 200, description = "New token pair", body = inline(SuccessResponse<TokenPairDto>)),
        (status = 400, description = "Refresh token missing", body = ErrorResponse),
        (
            status = 401,
            description = "Invalid, expired or already used refresh token",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "TOKEN_BLACKLISTED", "message": "Token is blacklisted" }
            })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[post("/api/auth/refresh")]
pub async fn refresh_token_handler(
    payload: web::Json<RefreshTokenRequestDto>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let request = match RefreshTokenRequest::new(payload.into_inner().refresh) {
        Ok(request) => request,
        Err(errors) => return ApiResponse::validation_error(errors),
    };

    match data.refresh_token_use_case.execute(request).await {
        Ok(pair) => ApiResponse::success(TokenPairDto::from(pair)),
        Err(e @ RefreshTokenError::TokenBlacklisted) => {
            ApiResponse::unauthorized("TOKEN_BLACKLISTED", &e.to_string())
        }
        Err(e @ RefreshTokenError::TokenExpired)
        | Err(e @ RefreshTokenError::TokenInvalid)
        | Err(e @ RefreshTokenError::InvalidTokenType)
        | Err(e @ RefreshTokenError::UserInactive) => {
            warn!(error = %e, "Refresh rejected");
            ApiResponse::unauthorized("INVALID_TOKEN", &e.to_string())
        }
        Err(e @ RefreshTokenError::BlacklistError(_))
        | Err(e @ RefreshTokenError::QueryError(_))
        | Err(e @ RefreshTokenError::TokenGenerationFailed(_)) => {
            error!(error = %e, "Refresh failed");
            ApiResponse::internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::ports::outgoing::TokenProvider;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::auth_fakes::{
        sample_user, test_jwt, InMemoryTokenRepository, InMemoryUsers,
    };
    use actix_web::{test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn same_refresh_token_works_once() {
        let user = sample_user("ada@example.com");
        let refresh = test_jwt().generate_refresh_token(user.id).unwrap();
        let state = TestAppStateBuilder::default()
            .with_users(InMemoryUsers::new().with_user(user))
            .with_token_repository(InMemoryTokenRepository::new())
            .build();
        let app =
            test::init_service(App::new().app_data(state).service(refresh_token_handler)).await;

        let first = test::TestRequest::post()
            .uri("/api/auth/refresh")
            .set_json(json!({ "refresh": refresh }))
            .to_request();
        let resp = test::call_service(&app, first).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_ne!(body["data"]["refresh"], refresh.as_str());

        let second = test::TestRequest::post()
            .uri("/api/auth/refresh")
            .set_json(json!({ "refresh": refresh }))
            .to_request();
        let resp = test::call_service(&app, second).await;
        assert_eq!(resp.status(), 401);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "TOKEN_BLACKLISTED");
    }

    #[actix_web::test]
    async fn access_token_cannot_refresh() {
        let user = sample_user("ada@example.com");
        let access = test_jwt().generate_access_token(user.id).unwrap();
        let state = TestAppStateBuilder::default()
            .with_users(InMemoryUsers::new().with_user(user))
            .build();
        let app =
            test::init_service(App::new().app_data(state).service(refresh_token_handler)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/refresh")
            .set_json(json!({ "refresh": access }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    }

    #[actix_web::test]
    async fn blacklist_outage_is_500() {
        let user = sample_user("ada@example.com");
        let refresh = test_jwt().generate_refresh_token(user.id).unwrap();
        let state = TestAppStateBuilder::default()
            .with_users(InMemoryUsers::new().with_user(user))
            .with_token_repository(InMemoryTokenRepository::failing())
            .build();
        let app =
            test::init_service(App::new().app_data(state).service(refresh_token_handler)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/refresh")
            .set_json(json!({ "refresh": refresh }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 500);
    }
}
