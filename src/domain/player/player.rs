use serde::{Deserialize, Serialize};

use super::value_objects::{PlayerId, Position};

/// Team identifier as issued by the identity service
pub type TeamId = i64;

/// A player stored on a team's roster
///
/// # Invariants
/// - Every field satisfied the validator when it was written
/// - `id` and `team_id` never change after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "_id")]
    pub id: PlayerId,
    pub team_id: TeamId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub position: Position,
}

/// Validated fields for a player that has not been stored yet
///
/// Carries no identifier and no team: both are decided by the store and
/// the caller's scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Position,
}

impl NewPlayer {
    /// Builds the stored record for `team_id` under a freshly generated id
    pub fn into_player(self, team_id: TeamId) -> Player {
        Player {
            id: PlayerId::new(),
            team_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            position: self.position,
        }
    }
}

/// Validated subset of player fields to overwrite
///
/// `None` leaves the stored value untouched. There is deliberately no way
/// to express a change of `id` or `team_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<Position>,
}

impl PlayerPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.position.is_none()
    }

    /// Applies the present fields to `player`
    pub fn apply_to(&self, player: &mut Player) {
        if let Some(first_name) = &self.first_name {
            player.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            player.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            player.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            player.phone = Some(phone.clone());
        }
        if let Some(position) = self.position {
            player.position = position;
        }
    }
}
