pub mod manage_cv;
pub mod manage_section;
