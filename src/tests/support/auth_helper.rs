use std::sync::Arc;

use actix_web::web;
use uuid::Uuid;

use super::auth_fakes::test_jwt;
use crate::auth::application::ports::outgoing::TokenProvider;

/// `Authorization` header carrying a fresh access token for `user_id`.
pub fn bearer(user_id: Uuid) -> (&'static str, String) {
    let token = test_jwt()
        .generate_access_token(user_id)
        .expect("access token");
    ("Authorization", format!("Bearer {}", token))
}

/// The provider the `AuthenticatedUser` extractor looks up in app data.
pub fn token_provider_data() -> web::Data<Arc<dyn TokenProvider + Send + Sync>> {
    let provider: Arc<dyn TokenProvider + Send + Sync> = Arc::new(test_jwt());
    web::Data::new(provider)
}
