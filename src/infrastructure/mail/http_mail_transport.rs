use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::notification::{DispatchError, MailTransport, OutboundMail};

/// Maximum number of characters of an upstream error body kept in errors
const MAX_ERROR_BODY: usize = 1000;

/// Email delivery over the provider's HTTP API
///
/// Posts the whole batch as one JSON document:
/// `{"from": .., "to": [..], "subject": .., "content": ..}`
#[derive(Clone)]
pub struct HttpMailTransport {
    http: Client,
    api_url: String,
    api_key: String,
}

impl HttpMailTransport {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<(), DispatchError> {
        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(mail)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DispatchError::Timeout
                } else {
                    DispatchError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .text()
            .await
            .map(|body| body.chars().take(MAX_ERROR_BODY).collect())
            .unwrap_or_else(|_| status.to_string());

        Err(DispatchError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
