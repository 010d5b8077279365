pub mod cv_repository;
pub mod section_repository;

pub use cv_repository::{CvRepository, CvRepositoryError};
pub use section_repository::{OwnedSection, SectionRepository, SectionRepositoryError};
