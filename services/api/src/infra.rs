use answer_review::error::AppError;
use answer_review::review::AnswerCatalog;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Reads the catalog at `path`, or the bundled sample question when none is given.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<Arc<AnswerCatalog>, AppError> {
    let catalog = match path {
        Some(path) => {
            let catalog = AnswerCatalog::from_path(path)?;
            info!(path = %path.display(), answers = catalog.len(), "loaded answer catalog");
            catalog
        }
        None => AnswerCatalog::sample()?,
    };

    Ok(Arc::new(catalog))
}
