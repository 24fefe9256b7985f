use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::player::{NewPlayer, Player, PlayerId, PlayerPatch, TeamId};
use crate::domain::repositories::{PlayerQuery, PlayerRepository, StoreError};

/// In-process implementation of PlayerRepository
///
/// Used when no database is configured and by the test suites. Same
/// scoping rules as the PostgreSQL adapter.
#[derive(Default)]
pub struct InMemoryPlayerRepository {
    players: RwLock<HashMap<PlayerId, Player>>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn create(&self, team_id: TeamId, player: NewPlayer) -> Result<Player, StoreError> {
        let player = player.into_player(team_id);
        self.players.write().await.insert(player.id, player.clone());
        Ok(player)
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Player>, StoreError> {
        let mut players: Vec<Player> = self
            .players
            .read()
            .await
            .values()
            .filter(|p| p.team_id == team_id)
            .cloned()
            .collect();

        players.sort_by_cached_key(|p| {
            (
                p.last_name.to_lowercase(),
                p.first_name.to_lowercase(),
                p.last_name.clone(),
                p.first_name.clone(),
            )
        });
        Ok(players)
    }

    async fn find(&self, query: &PlayerQuery) -> Result<Player, StoreError> {
        self.players
            .read()
            .await
            .get(&query.id())
            .filter(|p| query.matches(p))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(
        &self,
        query: &PlayerQuery,
        patch: &PlayerPatch,
    ) -> Result<Player, StoreError> {
        let mut players = self.players.write().await;
        let player = players
            .get_mut(&query.id())
            .filter(|p| query.matches(p))
            .ok_or(StoreError::NotFound)?;

        patch.apply_to(player);
        Ok(player.clone())
    }

    async fn delete(&self, query: &PlayerQuery) -> Result<Player, StoreError> {
        let mut players = self.players.write().await;
        let owned = players
            .get(&query.id())
            .is_some_and(|player| query.matches(player));
        if !owned {
            return Err(StoreError::NotFound);
        }

        players.remove(&query.id()).ok_or(StoreError::NotFound)
    }
}
