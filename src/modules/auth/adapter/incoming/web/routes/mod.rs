mod dto;
mod google_auth;
mod login_user;
mod logout_user;
mod profile;
mod refresh_token;
mod register_user;

pub use dto::{AuthSessionDto, TokenPairDto, UserDto};
pub use google_auth::{google_auth_handler, GoogleAuthRequestDto};
pub use login_user::{login_user_handler, LoginRequestDto};
pub use logout_user::{logout_user_handler, users_logout_handler, LogoutRequestDto};
pub use profile::{
    get_profile_handler, patch_profile_handler, put_profile_handler, upload_avatar_handler,
    UpdateProfileDto,
};
pub use refresh_token::{refresh_token_handler, RefreshTokenRequestDto};
pub use register_user::{register_user_handler, RegisterUserDto};

// utoipa path items live next to their handlers
pub use google_auth::__path_google_auth_handler;
pub use login_user::__path_login_user_handler;
pub use logout_user::__path_logout_user_handler;
pub use profile::{__path_get_profile_handler, __path_patch_profile_handler, __path_upload_avatar_handler};
pub use refresh_token::__path_refresh_token_handler;
pub use register_user::__path_register_user_handler;
