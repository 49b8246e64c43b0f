use crate::config::ConfigError;
use crate::reporting::{ReportImportError, StudentNotFound, UnknownSortKey};
use crate::review::{CatalogError, ReviewError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Catalog(CatalogError),
    Review(ReviewError),
    Report(ReportImportError),
    Sort(UnknownSortKey),
    Student(StudentNotFound),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Catalog(err) => write!(f, "answer catalog error: {}", err),
            AppError::Review(err) => write!(f, "review error: {}", err),
            AppError::Report(err) => write!(f, "report error: {}", err),
            AppError::Sort(err) => write!(f, "report error: {}", err),
            AppError::Student(err) => write!(f, "report error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Review(err) => Some(err),
            AppError::Report(err) => Some(err),
            AppError::Sort(err) => Some(err),
            AppError::Student(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Review(ReviewError::AnswerNotFound(_) | ReviewError::GroupNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Review(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Report(ReportImportError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Report(_) | AppError::Sort(_) => StatusCode::BAD_REQUEST,
            AppError::Student(_) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<ReviewError> for AppError {
    fn from(value: ReviewError) -> Self {
        Self::Review(value)
    }
}

impl From<ReportImportError> for AppError {
    fn from(value: ReportImportError) -> Self {
        Self::Report(value)
    }
}

impl From<UnknownSortKey> for AppError {
    fn from(value: UnknownSortKey) -> Self {
        Self::Sort(value)
    }
}

impl From<StudentNotFound> for AppError {
    fn from(value: StudentNotFound) -> Self {
        Self::Student(value)
    }
}
