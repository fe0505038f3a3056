use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::CurrentUser,
    error::reject,
    reports::{
        dto::{NewReport, ReportFilter, StatusSummary, UpdateStatusRequest},
        repo_types::Report,
        services::{apply_filter, summarize},
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/reports/mine", get(list_my_reports))
        .route("/reports/summary", get(report_summary))
        .route("/reports/:id", get(get_report))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", post(create_report))
        .route("/reports/:id/status", put(update_status))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // photos travel inline
}

/// All reports (admin panel, map), optionally filtered.
#[instrument(skip(state))]
pub async fn list_reports(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> Result<Json<Vec<Report>>, (StatusCode, String)> {
    state.reports.query(&filter).await.map(Json).map_err(reject)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_my_reports(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<ReportFilter>,
) -> Result<Json<Vec<Report>>, (StatusCode, String)> {
    let reports = state.reports.list_for_user(&user.id).await.map_err(reject)?;
    Ok(Json(apply_filter(reports, &filter)))
}

#[instrument(skip(state))]
pub async fn report_summary(
    State(state): State<AppState>,
) -> Result<Json<StatusSummary>, (StatusCode, String)> {
    let reports = state.reports.list_all().await.map_err(reject)?;
    Ok(Json(summarize(&reports)))
}

#[instrument(skip(state))]
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Report>, (StatusCode, String)> {
    state.reports.get(&id).await.map(Json).map_err(reject)
}

/// POST /reports, authored by the signed-in user.
#[instrument(skip(state, user, body))]
pub async fn create_report(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Json(body): Json<NewReport>,
) -> Result<(StatusCode, HeaderMap, Json<Report>), (StatusCode, String)> {
    let author = user.map(|CurrentUser(u)| u.id);
    let report = state
        .reports
        .create(body, author.as_deref())
        .await
        .map_err(reject)?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/reports/{}", report.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(report)))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Report>, (StatusCode, String)> {
    state
        .reports
        .update_status(&id, body.status, body.admin_notes, &user)
        .await
        .map(Json)
        .map_err(reject)
}
