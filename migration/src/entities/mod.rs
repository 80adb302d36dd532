pub mod friend_request;
pub mod phone_verification;
pub mod place;
pub mod place_bookmark;
pub mod place_comment;
pub mod place_image;
pub mod place_like;
pub mod profile;
pub mod profile_image;
pub mod user;
pub mod user_report;
