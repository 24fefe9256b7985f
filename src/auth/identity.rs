// Delegated authentication
// Forwards the caller's Authorization header to the identity service and
// turns the answer into the team scope for the rest of the request

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

use crate::domain::player::TeamId;

/// Claims returned by the identity service for a verified token
///
/// # Fields
/// * `team_id` - Team the caller may read and mutate. Taken from `team_id`,
///   or from `user_id` when the response has no `team_id`. A bare `id` is
///   the account's own id and never a team.
/// * `claims` - Every other member of the identity response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IdentityClaims")]
pub struct TeamScope {
    pub team_id: TeamId,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

/// Identity response as sent, before the scope is resolved
#[derive(Deserialize)]
struct IdentityClaims {
    team_id: Option<TeamId>,
    user_id: Option<TeamId>,
    #[serde(flatten)]
    claims: Map<String, Value>,
}

impl TryFrom<IdentityClaims> for TeamScope {
    type Error = String;

    fn try_from(raw: IdentityClaims) -> Result<Self, Self::Error> {
        let IdentityClaims {
            team_id,
            user_id,
            mut claims,
        } = raw;

        let team_id = team_id
            .or(user_id)
            .ok_or_else(|| "missing field `team_id`".to_string())?;

        if let Some(user_id) = user_id {
            claims.insert("user_id".to_string(), Value::from(user_id));
        }

        Ok(Self { team_id, claims })
    }
}

impl TeamScope {
    pub fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            claims: Map::new(),
        }
    }
}

/// Reasons a request could not be scoped to a team
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no Authorization on request header")]
    MissingHeader,

    /// The identity service refused the token; carries its response body
    #[error("{0}")]
    Rejected(String),

    #[error("identity service timed out")]
    Timeout,

    #[error("identity service unreachable: {0}")]
    Transport(String),

    #[error("identity service returned an unreadable scope: {0}")]
    InvalidResponse(String),
}

/// Turns an `Authorization` header value into a team scope
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, authorization: Option<&str>) -> Result<TeamScope, AuthError>;
}

/// HTTP client for the external identity service
///
/// One `GET` per verification, no retries and no caching.
#[derive(Clone)]
pub struct IdentityServiceClient {
    http: Client,
    verify_url: String,
}

impl IdentityServiceClient {
    /// Creates a client with its own connection pool
    ///
    /// # Arguments
    /// * `verify_url` - Endpoint answering 2xx plus claims for a valid token
    /// * `timeout` - Bound on the whole verification call
    pub fn new(verify_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, verify_url))
    }

    /// Creates a client sharing an existing connection pool
    pub fn with_client(http: Client, verify_url: impl Into<String>) -> Self {
        Self {
            http,
            verify_url: verify_url.into(),
        }
    }
}

#[async_trait]
impl TokenVerifier for IdentityServiceClient {
    async fn verify(&self, authorization: Option<&str>) -> Result<TeamScope, AuthError> {
        let authorization = authorization.ok_or(AuthError::MissingHeader)?;

        let response = self
            .http
            .get(&self.verify_url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Identity service rejected token");
            return Err(AuthError::Rejected(body));
        }

        let scope: TeamScope = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        tracing::debug!(team_id = scope.team_id, "Token verified");
        Ok(scope)
    }
}

fn classify_transport_error(error: reqwest::Error) -> AuthError {
    if error.is_timeout() {
        tracing::error!(error = %error, "Identity service timed out");
        AuthError::Timeout
    } else {
        tracing::error!(error = %error, "Identity service request failed");
        AuthError::Transport(error.to_string())
    }
}
