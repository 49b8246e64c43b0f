use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::debug;

use super::domain::AnswerId;
use super::filter::ExitTicket;
use super::session::ReviewSession;
use crate::error::AppError;

pub type SharedSession = Arc<Mutex<ReviewSession>>;

/// Router state: the single in-memory session plus the exit transition delay.
#[derive(Clone)]
pub struct ReviewState {
    session: SharedSession,
    exit_delay: Duration,
}

impl ReviewState {
    pub fn new(session: ReviewSession, exit_delay: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            exit_delay,
        }
    }

    pub fn session(&self) -> SharedSession {
        Arc::clone(&self.session)
    }

    /// Completes the tickets once the delay has passed, dropping the answers from the view.
    fn schedule_exits(&self, exits: Vec<ExitTicket>) {
        if exits.is_empty() {
            return;
        }

        let session = self.session();
        let delay = self.exit_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut guard = session.lock().await;
            let completed = exits
                .into_iter()
                .filter(|ticket| guard.complete_exit(*ticket))
                .count();
            debug!(completed, "exit transitions finished");
        });
    }
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub score: u8,
}

#[derive(Debug, Deserialize)]
pub struct GroupScoreRequest {
    pub group: String,
    pub score: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsRequest {
    #[serde(default)]
    pub hide_scored: Option<bool>,
    #[serde(default)]
    pub reveal_all: Option<bool>,
}

/// Router builder exposing the review session to a rendering client.
pub fn review_router(state: ReviewState) -> Router {
    Router::new()
        .route("/api/v1/review", get(view_handler))
        .route(
            "/api/v1/review/answers/:answer_id/score",
            post(score_handler).delete(clear_handler),
        )
        .route(
            "/api/v1/review/answers/:answer_id/reveal",
            post(reveal_handler),
        )
        .route("/api/v1/review/answers/:answer_id/adopt", post(adopt_handler))
        .route("/api/v1/review/answers/:answer_id/prompt", get(prompt_handler))
        .route("/api/v1/review/groups/score", post(group_score_handler))
        .route(
            "/api/v1/review/ai-suggestions/apply",
            post(apply_suggestions_handler),
        )
        .route("/api/v1/review/settings", put(settings_handler))
        .route("/api/v1/review/reset", post(reset_handler))
        .with_state(state)
}

pub(crate) async fn view_handler(State(state): State<ReviewState>) -> Response {
    let session = state.session.lock().await;
    (StatusCode::OK, Json(session.view())).into_response()
}

pub(crate) async fn score_handler(
    State(state): State<ReviewState>,
    Path(answer_id): Path<u32>,
    Json(request): Json<ScoreRequest>,
) -> Response {
    let outcome = {
        let mut session = state.session.lock().await;
        session.set_score(AnswerId(answer_id), request.score)
    };

    match outcome {
        Ok(outcome) => {
            state.schedule_exits(outcome.exit.into_iter().collect());
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn clear_handler(
    State(state): State<ReviewState>,
    Path(answer_id): Path<u32>,
) -> Response {
    let mut session = state.session.lock().await;
    match session.clear_score(AnswerId(answer_id)) {
        Ok(previous) => {
            let payload = json!({ "answer_id": answer_id, "previous": previous });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn reveal_handler(
    State(state): State<ReviewState>,
    Path(answer_id): Path<u32>,
) -> Response {
    let mut session = state.session.lock().await;
    let id = AnswerId(answer_id);
    let result = session
        .reveal_one(id)
        .and_then(|_| session.suggestion(id));

    match result {
        Ok(suggestion) => {
            let payload = json!({ "answer_id": answer_id, "suggestion": suggestion });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn adopt_handler(
    State(state): State<ReviewState>,
    Path(answer_id): Path<u32>,
) -> Response {
    let outcome = {
        let mut session = state.session.lock().await;
        session.adopt_suggestion(AnswerId(answer_id))
    };

    match outcome {
        Ok(outcome) => {
            state.schedule_exits(outcome.exit.into_iter().collect());
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn prompt_handler(
    State(state): State<ReviewState>,
    Path(answer_id): Path<u32>,
) -> Response {
    let session = state.session.lock().await;
    match session.grading_prompt(AnswerId(answer_id)) {
        Ok(prompt) => (StatusCode::OK, Json(prompt)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn group_score_handler(
    State(state): State<ReviewState>,
    Json(request): Json<GroupScoreRequest>,
) -> Response {
    let outcome = {
        let mut session = state.session.lock().await;
        session.apply_group_score(&request.group, request.score)
    };

    match outcome {
        Ok(outcome) => {
            state.schedule_exits(outcome.exits.clone());
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn apply_suggestions_handler(State(state): State<ReviewState>) -> Response {
    let outcome = {
        let mut session = state.session.lock().await;
        session.apply_all_ai_suggestions()
    };

    state.schedule_exits(outcome.exits.clone());
    (StatusCode::OK, Json(outcome)).into_response()
}

pub(crate) async fn settings_handler(
    State(state): State<ReviewState>,
    Json(request): Json<SettingsRequest>,
) -> Response {
    let (settings, exits) = {
        let mut session = state.session.lock().await;
        if let Some(reveal) = request.reveal_all {
            session.reveal_globally(reveal);
        }
        let exits = match request.hide_scored {
            Some(hide) => session.set_hide_scored(hide),
            None => Vec::new(),
        };
        (session.settings(), exits)
    };

    state.schedule_exits(exits);
    (StatusCode::OK, Json(settings)).into_response()
}

pub(crate) async fn reset_handler(State(state): State<ReviewState>) -> Response {
    let mut session = state.session.lock().await;
    session.reset();
    (StatusCode::OK, Json(session.view())).into_response()
}
