//! # Auth Module
//!
//! Token verification against the external identity provider:
//! - `/verify-token` and `/user/:uid` endpoints
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;


pub use extractors::AuthedUser;
pub use models::User;
pub use routes::auth_routes;
