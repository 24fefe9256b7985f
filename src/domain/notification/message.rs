use serde::{Deserialize, Serialize};

use crate::domain::player::TeamId;

/// Subject and body of a roster email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailContent {
    pub subject: String,
    pub body: String,
}

/// Free-form notification written by the caller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomMessage {
    pub mail_sender: String,
    pub mail_subject: String,
    pub mail_content: String,
}

/// An upcoming match the roster should hear about
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchEvent {
    #[serde(default)]
    pub id: Option<String>,
    /// Team the match payload claims to belong to. Never used as scope.
    #[serde(default)]
    pub user_id: Option<TeamId>,
    pub opponent: String,
    pub is_local: bool,
    pub alignment: String,
    pub url: String,
    pub city: String,
    pub weather: String,
    pub start_date: String,
}

impl MatchEvent {
    /// Derives subject and body from the match fields
    ///
    /// # Example
    /// ```
    /// use player_service::domain::notification::MatchEvent;
    ///
    /// let event = MatchEvent {
    ///     id: None,
    ///     user_id: None,
    ///     opponent: "Rayo".to_string(),
    ///     is_local: true,
    ///     alignment: "4-4-2".to_string(),
    ///     url: "https://maps.example.com/field".to_string(),
    ///     city: "Madrid".to_string(),
    ///     weather: "sunny".to_string(),
    ///     start_date: "2024-05-04 18:00".to_string(),
    /// };
    ///
    /// let mail = event.compose();
    /// assert_eq!(mail.subject, "Match against Rayo on 2024-05-04 18:00");
    /// assert!(mail.body.starts_with("opponent: Rayo\n"));
    /// ```
    pub fn compose(&self) -> MailContent {
        let fields = [
            ("opponent", self.opponent.clone()),
            ("is_local", self.is_local.to_string()),
            ("alignment", self.alignment.clone()),
            ("url", self.url.clone()),
            ("city", self.city.clone()),
            ("weather", self.weather.clone()),
            ("start_date", self.start_date.clone()),
        ];

        let body = fields
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n");

        MailContent {
            subject: format!("Match against {} on {}", self.opponent, self.start_date),
            body,
        }
    }
}

/// Body accepted by the notify endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NotificationRequest {
    Custom(CustomMessage),
    Match(MatchEvent),
}

impl NotificationRequest {
    /// Resolves sender and content; match events go out from `default_sender`
    pub fn into_mail(self, default_sender: &str) -> (String, MailContent) {
        match self {
            NotificationRequest::Custom(message) => (
                message.mail_sender,
                MailContent {
                    subject: message.mail_subject,
                    body: message.mail_content,
                },
            ),
            NotificationRequest::Match(event) => (default_sender.to_string(), event.compose()),
        }
    }

    /// Team id carried by a match payload, if any
    pub fn claimed_team(&self) -> Option<TeamId> {
        match self {
            NotificationRequest::Match(event) => event.user_id,
            NotificationRequest::Custom(_) => None,
        }
    }
}

/// Mail handed to the transport: one message for the whole batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub content: String,
}
