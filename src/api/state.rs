use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::domain::notification::NotificationDispatcher;
use crate::domain::repositories::PlayerRepository;

/// Shared, read-only resources handed to every request
#[derive(Clone)]
pub struct AppState {
    pub players: Arc<dyn PlayerRepository>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub dispatcher: NotificationDispatcher,
    pub notify: NotifySettings,
}

/// How the notify endpoint composes and reports roster emails
#[derive(Debug, Clone)]
pub struct NotifySettings {
    /// Sender of notifications derived from match events
    pub default_sender: String,
    /// Answer 406 instead of 202 when the roster is empty
    pub reject_empty_roster: bool,
}
