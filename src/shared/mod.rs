pub mod api;
pub mod config;
pub mod pagination;
pub mod rate_limit;
pub mod validation;
