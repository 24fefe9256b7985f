// Domain layer module exports
// Domain is independent of infrastructure concerns

pub mod notification;
pub mod player;
pub mod repositories;
