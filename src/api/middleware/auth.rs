use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::TeamScope;

/// Team-scope extractor for protected routes
///
/// Forwards the `Authorization` header to the identity service before any
/// body is read, so a request is always scoped before it is validated.
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(
///     TeamAuth(scope): TeamAuth,
/// ) -> Result<String, ApiError> {
///     Ok(format!("Hello team {}", scope.team_id))
/// }
/// ```
pub struct TeamAuth(pub TeamScope);

#[async_trait]
impl FromRequestParts<AppState> for TeamAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str())
            .transpose()
            .map_err(|_| ApiError::bad_request("Authorization header is not valid ASCII"))?;

        let scope = state.verifier.verify(authorization).await?;

        Ok(TeamAuth(scope))
    }
}
