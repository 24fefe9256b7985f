use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde::de::DeserializeOwned;

use crate::api::errors::ApiError;

/// JSON body extractor that answers 400 for every body problem
///
/// Unlike `axum::Json`, a missing or foreign `Content-Type` is a bad
/// request rather than 415, and the messages match what clients already
/// handle.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(req.headers()) {
            return Err(ApiError::bad_request("Content-Type must be application/json."));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::bad_request("Request body could not be read."))?;

        let value = serde_json::from_slice(&bytes)
            .map_err(|_| ApiError::bad_request("Request JSON data is ill-formed."))?;

        Ok(JsonBody(value))
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn accepts_json_with_charset() {
        assert!(is_json_content_type(&headers("application/json")));
        assert!(is_json_content_type(&headers("application/json; charset=utf-8")));
    }

    #[test]
    fn rejects_other_content_types() {
        assert!(!is_json_content_type(&headers("text/plain")));
        assert!(!is_json_content_type(&headers("application/x-www-form-urlencoded")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }
}
