// Player domain module
// Contains the player record, its value objects and the field validator

#![allow(clippy::module_inception)]

pub mod player;
pub mod validation;
pub mod value_objects;

// Re-export main types for convenience
pub use player::{NewPlayer, Player, PlayerPatch, TeamId};
pub use validation::{validate_new_player, validate_player_patch, FieldError, ValidationErrors};
pub use value_objects::{PlayerId, Position};
