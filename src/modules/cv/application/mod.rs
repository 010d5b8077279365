pub mod cv_use_cases;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use cv_use_cases::CvUseCases;
