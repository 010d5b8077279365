pub mod hash;
pub mod password;
pub mod user_profile;
