use actix_web::{dev::Payload, web, Error as ActixError, FromRequest, HttpRequest, HttpResponse};
use std::{
    future::{ready, Ready},
    sync::Arc,
};
use tracing::{debug, error};
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;
use crate::auth::application::ports::outgoing::token_provider::{TokenProvider, ACCESS_TOKEN};
use crate::shared::api::ApiResponse;

/// Caller identity taken from a valid `Authorization: Bearer <access token>`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl AuthenticatedUser {
    pub fn id(&self) -> UserId {
        UserId::from(self.user_id)
    }

    /// The caller behind a valid access token, or `None` for anyone else.
    /// Never produces a rejection.
    pub fn from_bearer(req: &HttpRequest) -> Option<Self> {
        let token_provider =
            req.app_data::<web::Data<Arc<dyn TokenProvider + Send + Sync>>>()?;
        let token = extract_token_from_header(req)?;

        match token_provider.verify_token(&token) {
            Ok(claims) if claims.token_type == ACCESS_TOKEN => Some(Self {
                user_id: claims.sub,
            }),
            _ => None,
        }
    }
}

fn create_api_error(response: HttpResponse) -> ActixError {
    actix_web::error::InternalError::from_response("", response).into()
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token_provider = match req.app_data::<web::Data<Arc<dyn TokenProvider + Send + Sync>>>()
        {
            Some(provider) => provider,
            None => {
                error!("Token provider is not registered as app data");
                return ready(Err(create_api_error(ApiResponse::internal_error())));
            }
        };

        let token = match extract_token_from_header(req) {
            Some(t) => t,
            None => {
                return ready(Err(create_api_error(ApiResponse::unauthorized(
                    "NOT_AUTHENTICATED",
                    "Authentication credentials were not provided",
                ))));
            }
        };

        match token_provider.verify_token(&token) {
            Ok(claims) if claims.token_type == ACCESS_TOKEN => {
                ready(Ok(AuthenticatedUser {
                    user_id: claims.sub,
                }))
            }
            Ok(_) => ready(Err(create_api_error(ApiResponse::unauthorized(
                "INVALID_TOKEN",
                "Token has wrong type",
            )))),
            Err(e) => {
                debug!(error = %e, "Rejected bearer token");
                ready(Err(create_api_error(ApiResponse::unauthorized(
                    "INVALID_TOKEN",
                    "Given token not valid for any token type",
                ))))
            }
        }
    }
}

fn extract_token_from_header(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
