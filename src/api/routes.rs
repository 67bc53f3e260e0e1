use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::api::health::HealthReport;
use crate::config::validate_window_hours;
use crate::error::AppError;
use crate::scorer::table::project;
use crate::scorer::{SignalTable, TimeWindow, View};
use crate::state::{Session, SessionStatus};
use crate::types::{BetCategory, Column, Sport};

#[derive(Clone)]
pub struct ApiState {
    pub session: Arc<Mutex<Session>>,
    pub default_sport: Sport,
    pub default_hours: u32,
    pub tz: Tz,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/picks", get(get_picks))
        .route("/refresh", post(post_refresh))
        .route("/health", get(get_health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct PicksQuery {
    pub sport: Option<String>,
    pub hours: Option<u32>,
    pub category: Option<String>,
    pub view: Option<String>,
}

#[derive(Deserialize)]
pub struct RefreshQuery {
    pub sport: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PicksResponse {
    pub sport: Sport,
    pub fetched_at: Option<DateTime<Utc>>,
    pub status: String,
    pub view: String,
    pub window_hours: Option<u32>,
    pub warning: Option<String>,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub sport: Sport,
    pub status: String,
    pub fetched_at: Option<DateTime<Utc>>,
    pub cards_seen: usize,
    pub consolidated: usize,
    pub rows: usize,
    pub warning: Option<String>,
}

/// Build the JSON table for one view of `table`, optionally bounded to the
/// kickoff window `[now, now + hours]`.
pub fn build_picks(
    table: &SignalTable,
    status: &SessionStatus,
    fetched_at: Option<DateTime<Utc>>,
    view: View,
    window: Option<(TimeWindow, u32)>,
) -> PicksResponse {
    let rows = table.view(view, window.as_ref().map(|(w, _)| w));
    PicksResponse {
        sport: table.sport(),
        fetched_at,
        status: status.to_string(),
        view: view.title(),
        window_hours: window.map(|(_, hours)| hours),
        warning: table.warning().map(str::to_string),
        columns: Column::ALL.iter().map(Column::header).collect(),
        rows: project(rows, &Column::ALL),
    }
}

/// `category` wins over `view` when both are given.
pub fn resolve_view(category: Option<&str>, view: Option<&str>) -> Result<View, AppError> {
    match (category, view) {
        (Some(c), _) => Ok(View::Category(c.parse::<BetCategory>()?)),
        (None, Some(v)) => v.parse::<View>(),
        (None, None) => Ok(View::All),
    }
}

fn resolve_sport(raw: Option<&str>, default: Sport) -> Result<Sport, AppError> {
    raw.map_or(Ok(default), str::parse)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_picks(
    State(state): State<ApiState>,
    Query(params): Query<PicksQuery>,
) -> Result<Json<PicksResponse>, AppError> {
    let sport = resolve_sport(params.sport.as_deref(), state.default_sport)?;
    let view = resolve_view(params.category.as_deref(), params.view.as_deref())?;
    let hours = validate_window_hours(params.hours.unwrap_or(state.default_hours))?;

    let mut session = state.session.lock().await;
    session.ensure(sport).await;

    let window = TimeWindow::next_hours(Utc::now(), hours, &state.tz);
    Ok(Json(build_picks(
        session.table(),
        session.status(),
        session.fetched_at(),
        view,
        Some((window, hours)),
    )))
}

async fn post_refresh(
    State(state): State<ApiState>,
    Query(params): Query<RefreshQuery>,
) -> Result<Json<RefreshResponse>, AppError> {
    let mut session = state.session.lock().await;
    let fallback = session.sport().unwrap_or(state.default_sport);
    let sport = resolve_sport(params.sport.as_deref(), fallback)?;

    session.request_refresh();
    let rows = session.ensure(sport).await.rows().len();

    let stats = session.stats();
    Ok(Json(RefreshResponse {
        sport,
        status: session.status().to_string(),
        fetched_at: session.fetched_at(),
        cards_seen: stats.extract.cards_seen,
        consolidated: stats.consolidated,
        rows,
        warning: session.table().warning().map(str::to_string),
    }))
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthReport> {
    let session = state.session.lock().await;
    Json(HealthReport::from_session(&*session))
}
