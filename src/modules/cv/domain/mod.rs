pub mod dates;
pub mod entities;
pub mod fields;
pub mod sections;
