use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use super::message::OutboundMail;

/// Failures while handing a batch to the email transport
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The transport answered with a non-success status
    #[error("mail transport rejected the batch ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("mail transport timed out")]
    Timeout,

    #[error("mail transport unreachable: {0}")]
    Transport(String),
}

/// Delivers one mail to all of its recipients in a single call
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<(), DispatchError>;
}

/// Outcome of a dispatch that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// The batch was accepted for this many distinct recipients
    Sent { recipients: usize },
    /// The roster was empty; nothing was sent
    NoRecipients,
}

impl DispatchResult {
    pub fn recipient_count(&self) -> usize {
        match self {
            DispatchResult::Sent { recipients } => *recipients,
            DispatchResult::NoRecipients => 0,
        }
    }
}

/// Sends a roster-wide email through a [`MailTransport`]
///
/// There are no retries and no partial success: the batch either goes out
/// in one transport call or the whole dispatch fails.
#[derive(Clone)]
pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Sends `subject`/`body` from `sender` to every distinct recipient
    ///
    /// Recipients are de-duplicated by address, ignoring case and keeping
    /// the first spelling seen. An empty roster never reaches the transport.
    pub async fn dispatch<I>(
        &self,
        sender: &str,
        recipients: I,
        subject: &str,
        body: &str,
    ) -> Result<DispatchResult, DispatchError>
    where
        I: IntoIterator<Item = String>,
    {
        let to = dedupe_recipients(recipients);
        if to.is_empty() {
            tracing::info!(sender = %sender, "No recipients, skipping mail dispatch");
            return Ok(DispatchResult::NoRecipients);
        }

        let mail = OutboundMail {
            from: sender.to_string(),
            to,
            subject: subject.to_string(),
            content: body.to_string(),
        };

        self.transport.send(&mail).await.map_err(|e| {
            tracing::warn!(error = %e, recipients = mail.to.len(), "Mail dispatch failed");
            e
        })?;

        tracing::info!(recipients = mail.to.len(), subject = %mail.subject, "Mail dispatched");
        Ok(DispatchResult::Sent {
            recipients: mail.to.len(),
        })
    }
}

fn dedupe_recipients<I>(recipients: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    recipients
        .into_iter()
        .map(|address| address.trim().to_string())
        .filter(|address| !address.is_empty())
        .filter(|address| seen.insert(address.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutboundMail>>,
        reject_with: Option<u16>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, mail: &OutboundMail) -> Result<(), DispatchError> {
            self.sent.lock().await.push(mail.clone());
            match self.reject_with {
                Some(status) => Err(DispatchError::Rejected {
                    status,
                    message: "quota exceeded".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    fn addresses(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn sends_one_batch_to_distinct_recipients() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = NotificationDispatcher::new(transport.clone());

        let result = dispatcher
            .dispatch(
                "coach@club.com",
                addresses(&["a@club.com", "b@club.com", "A@club.com", "a@club.com"]),
                "Match",
                "Saturday",
            )
            .await
            .expect("dispatch succeeds");

        assert_eq!(result, DispatchResult::Sent { recipients: 2 });

        let sent = transport.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, addresses(&["a@club.com", "b@club.com"]));
        assert_eq!(sent[0].from, "coach@club.com");
        assert_eq!(sent[0].subject, "Match");
        assert_eq!(sent[0].content, "Saturday");
    }

    #[tokio::test]
    async fn empty_roster_never_calls_transport() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = NotificationDispatcher::new(transport.clone());

        let result = dispatcher
            .dispatch("coach@club.com", Vec::new(), "Match", "Saturday")
            .await
            .expect("dispatch succeeds");

        assert_eq!(result, DispatchResult::NoRecipients);
        assert_eq!(result.recipient_count(), 0);
        assert!(transport.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn blank_addresses_do_not_count() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = NotificationDispatcher::new(transport.clone());

        let result = dispatcher
            .dispatch("coach@club.com", addresses(&["", "  "]), "s", "b")
            .await
            .unwrap();

        assert_eq!(result, DispatchResult::NoRecipients);
    }

    #[tokio::test]
    async fn transport_rejection_fails_whole_batch() {
        let transport = Arc::new(RecordingTransport {
            reject_with: Some(429),
            ..Default::default()
        });
        let dispatcher = NotificationDispatcher::new(transport.clone());

        let err = dispatcher
            .dispatch("coach@club.com", addresses(&["a@club.com"]), "s", "b")
            .await
            .unwrap_err();

        match err {
            DispatchError::Rejected { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }
        assert_eq!(transport.sent.lock().await.len(), 1);
    }
}
