pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, AuthSubject, request_identity};
pub use cors::create_cors;
