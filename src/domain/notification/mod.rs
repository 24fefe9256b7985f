// Notification domain module
// Composes roster emails and hands them to a mail transport as one batch

pub mod dispatcher;
pub mod message;

pub use dispatcher::{DispatchError, DispatchResult, MailTransport, NotificationDispatcher};
pub use message::{CustomMessage, MailContent, MatchEvent, NotificationRequest, OutboundMail};
