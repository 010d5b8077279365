pub mod app_state_builder;
pub mod auth_fakes;
pub mod auth_helper;
pub mod cv_fakes;
