use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, Error};
use tracing::error;

use super::{ANON_SCOPE, USER_SCOPE};
use crate::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::AppState;

/// Global throttle for `/api/` routes. Signed-in callers count against their
/// user id and everyone else against their address. Runs before the
/// per-endpoint auth limits.
pub async fn throttle_requests<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    if !req.path().starts_with("/api/") {
        return next.call(req).await.map(|res| res.map_into_left_body());
    }

    let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
        error!("AppState is not registered; request not throttled");
        return next.call(req).await.map(|res| res.map_into_left_body());
    };

    let verdict = match AuthenticatedUser::from_bearer(req.request()) {
        Some(user) => {
            state
                .throttle
                .check(USER_SCOPE, &user.user_id.to_string())
                .await
        }
        None => state.throttle.enforce(ANON_SCOPE, req.request()).await,
    };

    match verdict {
        Ok(()) => next.call(req).await.map(|res| res.map_into_left_body()),
        Err(throttled) => Ok(req.into_response(throttled).map_into_right_body()),
    }
}
