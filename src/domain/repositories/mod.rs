// Repository interfaces (ports)
// Infrastructure adapters implement these traits

pub mod player_repository;

pub use player_repository::{PlayerQuery, PlayerRepository, StoreError};
