pub mod contacts;
pub mod cvs;
pub mod educations;
pub mod experiences;
pub mod interests;
pub mod languages;
pub mod skills;
