// Mail transport adapters

pub mod http_mail_transport;

pub use http_mail_transport::HttpMailTransport;
