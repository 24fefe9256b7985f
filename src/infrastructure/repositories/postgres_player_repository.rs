use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::player::{NewPlayer, Player, PlayerPatch, Position, TeamId};
use crate::domain::repositories::{PlayerQuery, PlayerRepository, StoreError};

const PLAYER_COLUMNS: &str = "id, team_id, first_name, last_name, email, phone, position";

/// Row shape of the `players` table
#[derive(Debug, FromRow)]
struct PlayerRow {
    id: Uuid,
    team_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    position: String,
}

impl TryFrom<PlayerRow> for Player {
    type Error = StoreError;

    fn try_from(row: PlayerRow) -> Result<Self, Self::Error> {
        let position: Position = row
            .position
            .parse()
            .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))?;

        Ok(Player {
            id: row.id.into(),
            team_id: row.team_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            position,
        })
    }
}

/// PostgreSQL implementation of PlayerRepository
///
/// Every statement that touches a single player filters on both `id` and
/// `team_id`, so rows of other teams are indistinguishable from missing rows.
pub struct PostgresPlayerRepository {
    pool: PgPool,
}

impl PostgresPlayerRepository {
    /// Creates a new PostgresPlayerRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for PostgresPlayerRepository {
    async fn create(&self, team_id: TeamId, player: NewPlayer) -> Result<Player, StoreError> {
        let player = player.into_player(team_id);

        sqlx::query(
            r#"
            INSERT INTO players (id, team_id, first_name, last_name, email, phone, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(player.id.as_uuid())
        .bind(player.team_id)
        .bind(&player.first_name)
        .bind(&player.last_name)
        .bind(&player.email)
        .bind(&player.phone)
        .bind(player.position.as_str())
        .execute(&self.pool)
        .await?;

        tracing::info!(player_id = %player.id, team_id = team_id, "Player created");
        Ok(player)
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Player>, StoreError> {
        let rows = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {} FROM players WHERE team_id = $1 ORDER BY lower(last_name), lower(first_name), last_name, first_name",
            PLAYER_COLUMNS
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Player::try_from).collect()
    }

    async fn find(&self, query: &PlayerQuery) -> Result<Player, StoreError> {
        let row = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {} FROM players WHERE id = $1 AND team_id = $2",
            PLAYER_COLUMNS
        ))
        .bind(query.id().as_uuid())
        .bind(query.team_id())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Player::try_from(row)
    }

    async fn update(
        &self,
        query: &PlayerQuery,
        patch: &PlayerPatch,
    ) -> Result<Player, StoreError> {
        let row = sqlx::query_as::<_, PlayerRow>(&format!(
            r#"
            UPDATE players SET
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                position = COALESCE($7, position)
            WHERE id = $1 AND team_id = $2
            RETURNING {}
            "#,
            PLAYER_COLUMNS
        ))
        .bind(query.id().as_uuid())
        .bind(query.team_id())
        .bind(&patch.first_name)
        .bind(&patch.last_name)
        .bind(&patch.email)
        .bind(&patch.phone)
        .bind(patch.position.map(|p| p.as_str()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        tracing::info!(player_id = %query.id(), team_id = query.team_id(), "Player updated");
        Player::try_from(row)
    }

    async fn delete(&self, query: &PlayerQuery) -> Result<Player, StoreError> {
        let row = sqlx::query_as::<_, PlayerRow>(&format!(
            "DELETE FROM players WHERE id = $1 AND team_id = $2 RETURNING {}",
            PLAYER_COLUMNS
        ))
        .bind(query.id().as_uuid())
        .bind(query.team_id())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        tracing::info!(player_id = %query.id(), team_id = query.team_id(), "Player deleted");
        Player::try_from(row)
    }
}
