use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::middleware::{JsonBody, TeamAuth};
use crate::api::state::AppState;
use crate::domain::player::{validate_new_player, validate_player_patch, Player, TeamId};
use crate::domain::repositories::PlayerQuery;

/// Roster of one team
#[derive(Debug, Serialize)]
pub struct TeamPlayersResponse {
    pub team_id: TeamId,
    pub players: Vec<Player>,
}

/// List the caller's own roster
///
/// GET /api/v1/players
///
/// An empty roster is a normal answer here.
pub async fn list_my_players(
    State(state): State<AppState>,
    TeamAuth(scope): TeamAuth,
) -> Result<Json<TeamPlayersResponse>, ApiError> {
    let players = state.players.list_by_team(scope.team_id).await?;

    Ok(Json(TeamPlayersResponse {
        team_id: scope.team_id,
        players,
    }))
}

/// List any team's roster by its id, without authentication
///
/// GET /api/v1/players/:team_id
///
/// Kept for older clients. Unlike [`list_my_players`], an empty roster is
/// reported as a bad request.
pub async fn list_team_players(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<TeamPlayersResponse>, ApiError> {
    let team_id: TeamId = team_id
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("'{}' is not a valid team id", team_id)))?;

    let players = state.players.list_by_team(team_id).await?;
    if players.is_empty() {
        return Err(ApiError::bad_request(format!(
            "no players found for team {}",
            team_id
        )));
    }

    Ok(Json(TeamPlayersResponse { team_id, players }))
}

/// Get one player of the caller's team
///
/// GET /api/v1/player/:id
pub async fn get_player(
    State(state): State<AppState>,
    TeamAuth(scope): TeamAuth,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let query = PlayerQuery::parse(&id, scope.team_id)?;
    let player = state.players.find(&query).await?;

    Ok(Json(player))
}

/// Add a player to the caller's team
///
/// POST /api/v1/player
///
/// Any `_id` or `team_id` in the body is ignored.
pub async fn create_player(
    State(state): State<AppState>,
    TeamAuth(scope): TeamAuth,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Player>, ApiError> {
    let new_player = validate_new_player(&body)?;
    let player = state.players.create(scope.team_id, new_player).await?;

    Ok(Json(player))
}

/// Overwrite the fields present in the body
///
/// PUT /api/v1/player/:id
pub async fn update_player(
    State(state): State<AppState>,
    TeamAuth(scope): TeamAuth,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Player>, ApiError> {
    let query = PlayerQuery::parse(&id, scope.team_id)?;
    let patch = validate_player_patch(&body)?;
    let player = state.players.update(&query, &patch).await?;

    Ok(Json(player))
}

/// Remove a player, answering with the record as it was
///
/// DELETE /api/v1/player/:id
pub async fn delete_player(
    State(state): State<AppState>,
    TeamAuth(scope): TeamAuth,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let query = PlayerQuery::parse(&id, scope.team_id)?;
    let player = state.players.delete(&query).await?;

    Ok(Json(player))
}
