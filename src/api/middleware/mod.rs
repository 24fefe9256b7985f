// Request extractors shared by the handlers

pub mod auth;
pub mod json;

pub use auth::TeamAuth;
pub use json::JsonBody;
