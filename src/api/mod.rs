use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Json,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeFile, trace::TraceLayer};

use crate::config::DataConfig;
use crate::db::StatsStore;
use crate::error::StatsError;
use crate::models::{AnalyzeBetRequest, BetAnalysis, HealthReport, PlayersQuery};
use crate::services::{list_players, list_teams, BetAnalyzer};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StatsStore>,
}

pub async fn serve(port: u16, config: DataConfig) -> anyhow::Result<()> {
    // Tables are fully loaded before the listener accepts anything
    let store = StatsStore::load(&config)?;
    let state = AppState {
        store: Arc::new(store),
    };

    let app = create_router(state, &config.index_page());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Statline API server listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState, index_page: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(index_page))
        .route("/health", get(health_check))
        .route("/teams", get(get_teams_handler))
        .route("/players", get(get_players_handler))
        .route("/analyze_bet", post(analyze_bet_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

// GET /health - Table sizes and load time
async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    let store = &state.store;
    Json(HealthReport {
        status: "ok",
        players: store.player_row_count(),
        teams: store.team_count(),
        games: store.games().len(),
        game_columns: store.game_columns(),
        stat_columns: store.stat_columns().map(str::to_string).collect(),
        loaded_at: store.loaded_at(),
    })
}

// GET /teams - All canonical team names
async fn get_teams_handler() -> Json<Vec<&'static str>> {
    Json(list_teams())
}

// GET /players?team=<full name> - Sorted roster, empty for unknown teams
async fn get_players_handler(
    State(state): State<AppState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Json<Vec<String>> {
    // First `team` wins; an unreadable query string is treated as no team
    let team = match params {
        Ok(Query(pairs)) => PlayersQuery::from_pairs(pairs).team,
        Err(rejection) => {
            tracing::warn!("Ignoring unreadable /players query: {}", rejection.body_text());
            None
        }
    };
    Json(list_players(&state.store, team.as_deref()))
}

// POST /analyze_bet - Grade a line against the player's average
async fn analyze_bet_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeBetRequest>, JsonRejection>,
) -> Result<Json<BetAnalysis>, StatsError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("Rejected analyze_bet body: {}", rejection.body_text());
        StatsError::MalformedRequest(rejection.body_text())
    })?;

    match BetAnalyzer::new(&state.store).analyze(&request) {
        Ok(analysis) => Ok(Json(analysis)),
        Err(e) => {
            tracing::warn!(
                "analyze_bet failed for {} / {}: {}",
                request.team,
                request.player,
                e
            );
            Err(e)
        }
    }
}
