use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::middleware::{JsonBody, TeamAuth};
use crate::api::state::AppState;
use crate::domain::notification::{DispatchResult, NotificationRequest};

/// Response from an accepted notification
#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub message: String,
    pub recipients: usize,
}

/// Email the caller's roster
///
/// POST /api/v1/notify-players
///
/// The roster is always the authenticated team's. A `user_id` in a match
/// payload is never used to pick recipients.
pub async fn notify_players(
    State(state): State<AppState>,
    TeamAuth(scope): TeamAuth,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<NotifyResponse>), ApiError> {
    let request: NotificationRequest = serde_json::from_value(body).map_err(|_| {
        ApiError::bad_request(
            "Body must be a match event or contain mail_sender, mail_subject and mail_content.",
        )
    })?;

    if let Some(claimed) = request.claimed_team() {
        if claimed != scope.team_id {
            tracing::warn!(
                team_id = scope.team_id,
                claimed_team = claimed,
                "Match payload names another team, notifying the authenticated team"
            );
        }
    }

    let (sender, mail) = request.into_mail(&state.notify.default_sender);
    let roster = state.players.list_by_team(scope.team_id).await?;

    let result = state
        .dispatcher
        .dispatch(
            &sender,
            roster.into_iter().map(|player| player.email),
            &mail.subject,
            &mail.body,
        )
        .await?;

    if result == DispatchResult::NoRecipients && state.notify.reject_empty_roster {
        return Err(ApiError::not_acceptable(format!(
            "no players found for team {}",
            scope.team_id
        )));
    }

    let recipients = result.recipient_count();
    Ok((
        StatusCode::ACCEPTED,
        Json(NotifyResponse {
            message: format!("mail sent to {} players", recipients),
            recipients,
        }),
    ))
}
