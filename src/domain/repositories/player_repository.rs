use async_trait::async_trait;
use thiserror::Error;

use crate::domain::player::{NewPlayer, Player, PlayerId, PlayerPatch, TeamId};

/// Errors raised by player storage
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier is not well formed for the store's id scheme
    #[error("invalid player id: {0}")]
    InvalidIdentifier(String),

    /// No player with this id in the caller's team. Also returned when the
    /// player exists under another team.
    #[error("player not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Address of a single stored player
///
/// The team is part of the query itself, so a lookup that is not scoped to
/// a team cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerQuery {
    id: PlayerId,
    team_id: TeamId,
}

impl PlayerQuery {
    pub fn new(id: PlayerId, team_id: TeamId) -> Self {
        Self { id, team_id }
    }

    /// Builds a query from a raw path identifier
    ///
    /// # Example
    /// ```
    /// use player_service::domain::repositories::{PlayerQuery, StoreError};
    ///
    /// let err = PlayerQuery::parse("12", 0).unwrap_err();
    /// assert!(matches!(err, StoreError::InvalidIdentifier(_)));
    /// ```
    pub fn parse(raw_id: &str, team_id: TeamId) -> Result<Self, StoreError> {
        PlayerId::parse(raw_id)
            .map(|id| Self::new(id, team_id))
            .ok_or_else(|| StoreError::InvalidIdentifier(raw_id.to_string()))
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns true when `player` is the record this query addresses
    pub fn matches(&self, player: &Player) -> bool {
        player.id == self.id && player.team_id == self.team_id
    }
}

/// Repository trait for team-scoped player records
///
/// Implementations must treat "exists under another team" exactly like
/// "does not exist".
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Stores a new player under `team_id` and returns it with its new id
    async fn create(&self, team_id: TeamId, player: NewPlayer) -> Result<Player, StoreError>;

    /// All players of a team, ordered by last then first name ignoring case.
    /// May be empty.
    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Player>, StoreError>;

    /// Find one player of the caller's team
    async fn find(&self, query: &PlayerQuery) -> Result<Player, StoreError>;

    /// Overwrite the fields present in `patch`, returning the stored result
    async fn update(&self, query: &PlayerQuery, patch: &PlayerPatch)
        -> Result<Player, StoreError>;

    /// Remove a player, returning the record as it was before deletion
    async fn delete(&self, query: &PlayerQuery) -> Result<Player, StoreError>;
}
