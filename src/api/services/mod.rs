pub mod error_code;
pub mod helpers;
pub mod place;
pub mod types;
pub mod user;

pub use error_code::ErrorCode;
pub use place::place_routes;
pub use types::{ApiResponse, MessageResponse, PageQuery, PaginatedResponse, PaginationInfo};
pub use user::user_routes;
