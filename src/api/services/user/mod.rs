//! User API（`/users`）

mod auth;
mod friends;
mod profile;
mod routes;
mod social;
mod types;
mod verification;

pub use routes::user_routes;
