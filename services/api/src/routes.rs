use crate::infra::AppState;
use answer_review::error::AppError;
use answer_review::reporting::{
    ClassReport, ResultsImporter, SortDirection, SortKey, SortState, StudentDetail,
};
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    pub(crate) sort: Option<String>,
    #[serde(default)]
    pub(crate) ascending: bool,
}

impl ReportQuery {
    fn sort_state(&self) -> Result<SortState, AppError> {
        let key = match self.sort.as_deref() {
            Some(raw) => raw.parse::<SortKey>()?,
            None => SortState::default().key,
        };
        let direction = if self.ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        Ok(SortState::new(key, direction))
    }
}

pub(crate) fn with_service_routes(router: axum::Router) -> axum::Router {
    router
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/report", axum::routing::post(report_endpoint))
        .route(
            "/api/v1/report/students/:student_id",
            axum::routing::post(student_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Accepts a results CSV export as the request body.
pub(crate) async fn report_endpoint(
    Query(query): Query<ReportQuery>,
    body: String,
) -> Result<Json<ClassReport>, AppError> {
    let sort = query.sort_state()?;
    let results = ResultsImporter::from_reader(Cursor::new(body.into_bytes()))?;
    Ok(Json(ClassReport::build(&results, sort)))
}

/// Per-question breakdown for one student of the same CSV export.
pub(crate) async fn student_report_endpoint(
    Path(student_id): Path<String>,
    body: String,
) -> Result<Json<StudentDetail>, AppError> {
    let results = ResultsImporter::from_reader(Cursor::new(body.into_bytes()))?;
    Ok(Json(StudentDetail::build(&results, &student_id)?))
}
