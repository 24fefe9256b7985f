//! Player Service Library
//!
//! Team-scoped player records behind a delegated identity check, plus
//! roster-wide email notifications.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
