//! Business logic services
//!
//! Provides unified business logic shared between HTTP handlers and the CLI.

pub mod comment_service;
pub mod friend_service;
pub mod notify;
pub mod place_service;
pub mod social_login;
pub mod user_service;
pub mod verification_service;

pub use comment_service::CommentService;
pub use friend_service::FriendService;
pub use place_service::PlaceService;
pub use user_service::UserService;
pub use verification_service::VerificationService;
