pub mod json_config;
pub mod page;
pub mod response;

pub use json_config::custom_json_config;
pub use page::{invalid_page, paginated, PageDto, PageQuery};
pub use response::{ApiError, ApiResponse, FieldErrors};
