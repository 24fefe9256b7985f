// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::{health, notifications, players};
pub use state::{AppState, NotifySettings};

/// Builds the full HTTP surface of the service
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Trailing-slash variants are what the existing clients call
    let v1 = Router::new()
        .route("/players", get(players::list_my_players))
        .route("/players/", get(players::list_my_players))
        .route("/players/:team_id", get(players::list_team_players))
        .route("/player", post(players::create_player))
        .route(
            "/player/:id",
            get(players::get_player)
                .put(players::update_player)
                .delete(players::delete_player),
        )
        .route("/notify-players", post(notifications::notify_players))
        .route("/notify-players/", post(notifications::notify_players));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", v1)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
