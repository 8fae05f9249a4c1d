use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use shared::{
    domain::MatchRecord,
    error::{ApiError, ErrorCode},
    protocol::{AddMatchRequest, BracketTable, DishStatusEntry, ProgressionEntry, RosterSummary},
};
use storage::Storage;
use tournament::{Tournament, TournamentError};
use tracing::{error, info};

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, normalize_database_url};

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let roster = settings.roster()?;
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = Arc::new(AppState {
        tournament: Tournament::new(storage.clone(), roster),
    });
    let app = build_router(state);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, roster_size = roster.size(), "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await;
    info!("match log closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to listen for shutdown signal");
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/roster", get(http_roster))
        .route("/matches", get(http_list_matches).post(http_add_match))
        .route("/matches/last", delete(http_remove_last))
        .route("/status", get(http_status))
        .route("/bracket", get(http_bracket))
        .route("/progression", get(http_progression))
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, HttpError> {
    state.tournament.store().health_check().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(ErrorCode::Internal, e.to_string())),
        )
    })?;
    Ok("ok")
}

async fn http_roster(State(state): State<Arc<AppState>>) -> Json<RosterSummary> {
    Json(state.tournament.roster().into())
}

async fn http_list_matches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MatchRecord>>, HttpError> {
    let matches = state.tournament.matches().await.map_err(http_error)?;
    Ok(Json(matches))
}

async fn http_add_match(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddMatchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MatchRecord>), HttpError> {
    let Json(req) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )
    })?;
    let record = state
        .tournament
        .add_match(req.round, req.winner, req.loser)
        .await
        .map_err(http_error)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn http_remove_last(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MatchRecord>, HttpError> {
    let removed = state.tournament.remove_last().await.map_err(http_error)?;
    Ok(Json(removed))
}

async fn http_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DishStatusEntry>>, HttpError> {
    let statuses = state.tournament.status().await.map_err(http_error)?;
    Ok(Json(
        statuses
            .into_iter()
            .map(|(dish, status)| DishStatusEntry { dish, status })
            .collect(),
    ))
}

async fn http_bracket(State(state): State<Arc<AppState>>) -> Result<Json<BracketTable>, HttpError> {
    let table = state.tournament.bracket_table().await.map_err(http_error)?;
    Ok(Json(table))
}

async fn http_progression(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProgressionEntry>>, HttpError> {
    let entries = state.tournament.progression().await.map_err(http_error)?;
    Ok(Json(entries))
}

fn http_error(err: TournamentError) -> HttpError {
    let api: ApiError = err.into();
    let status = match api.code {
        ErrorCode::InvalidMatch | ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::EmptyLog => StatusCode::CONFLICT,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(api))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
