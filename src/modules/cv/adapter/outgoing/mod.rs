pub mod cv_repo_postgres;
pub mod sea_orm_entity;
pub mod section_repo_postgres;
pub mod section_tables;

pub use cv_repo_postgres::CvRepoPostgres;
pub use section_repo_postgres::SectionRepoPostgres;
pub use section_tables::SectionTable;
