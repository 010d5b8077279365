pub mod cv_service;
pub mod ownership;
pub mod section_service;

pub use cv_service::CvService;
pub use section_service::SectionService;
