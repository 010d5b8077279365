pub mod fetch_profile;
pub mod google_auth;
pub mod login_user;
pub mod logout_user;
pub mod refresh_token;
pub mod register_user;
pub mod update_profile;
pub mod upload_avatar;
