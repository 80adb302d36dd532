//! Place API（`/places`）

mod comments;
mod images;
mod posts;
mod routes;
mod search;
mod types;

pub use routes::place_routes;
