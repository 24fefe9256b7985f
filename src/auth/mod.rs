// Authentication module
// Token verification is delegated to the external identity service

pub mod identity;

pub use identity::{AuthError, IdentityServiceClient, TeamScope, TokenVerifier};
