pub mod fetch_profile;
pub mod update_profile;
pub mod upload_avatar;

pub use fetch_profile::FetchProfileService;
pub use update_profile::UpdateProfileService;
pub use upload_avatar::UploadAvatarService;
