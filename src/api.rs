use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use url::Url;

use crate::config::ServerConfig;
use crate::docs;
use crate::extract::Extractors;
use crate::merge::{merge_articles, NormalizedArticle};
use crate::request_log::{RequestLog, ERROR_LABEL};
use crate::validate::parse_article_url;

pub const EXTRACT_PATH: &str = "/extractor-blog";

pub const MSG_URL_REQUIRED: &str = "URL is required";
pub const MSG_INVALID_URL: &str = "URL must start with http:// or https://";
pub const MSG_EXTRACTION_FAILED: &str = "Could not retrieve information for the provided URL.";

#[derive(Clone)]
pub struct AppState {
    pub extractors: Extractors,
    pub request_log: RequestLog,
}

impl AppState {
    pub fn new(extractors: Extractors, request_log: RequestLog) -> Self {
        Self {
            extractors,
            request_log,
        }
    }

    pub fn from_config(cfg: &ServerConfig) -> anyhow::Result<Self> {
        let extractors = Extractors::from_settings(&cfg.fetch)?;
        Ok(Self::new(extractors, RequestLog::new(&cfg.log_dir)))
    }
}

/// Client-visible failures. Collaborator details never reach the body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{}", MSG_URL_REQUIRED)]
    MissingUrl,
    #[error("{}", MSG_INVALID_URL)]
    InvalidUrl,
    #[error("{}", MSG_EXTRACTION_FAILED)]
    ExtractionFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::ExtractionFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(EXTRACT_PATH, post(extract_blog))
        .merge(docs::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct ExtractReq {
    #[serde(default)]
    url: Option<Value>,
}

/// `url` must be present and non-null; anything present that is not a valid
/// http(s) URL string is malformed.
fn check_url(raw: Option<Value>) -> Result<(String, Url), ApiError> {
    match raw {
        None | Some(Value::Null) => Err(ApiError::MissingUrl),
        Some(Value::String(s)) => match parse_article_url(&s) {
            Some(url) => Ok((s, url)),
            None => Err(ApiError::InvalidUrl),
        },
        Some(_) => Err(ApiError::InvalidUrl),
    }
}

async fn extract_blog(
    State(state): State<AppState>,
    body: Result<Json<ExtractReq>, JsonRejection>,
) -> Result<Json<NormalizedArticle>, ApiError> {
    // An unreadable body carries no URL.
    let raw = body.ok().and_then(|Json(req)| req.url);
    let (raw_url, url) = check_url(raw).inspect_err(|e| {
        counter!("extract_requests_total", "outcome" => "rejected").increment(1);
        info!(reason = %e, "extract request rejected");
    })?;

    match state.extractors.extract_both(&url).await {
        Ok(found) => {
            let article = merge_articles(found.primary.as_ref(), found.secondary.as_ref());
            counter!("extract_requests_total", "outcome" => "ok").increment(1);
            info!(
                url = %raw_url,
                winner = found.winner,
                primary = found.primary.is_some(),
                secondary = found.secondary.is_some(),
                "article extracted"
            );
            state
                .request_log
                .spawn_record(&article, &raw_url, found.winner);
            Ok(Json(article))
        }
        Err(e) => {
            counter!("extract_requests_total", "outcome" => "failed").increment(1);
            warn!(url = %raw_url, error = %e, "both extractors failed");
            state
                .request_log
                .spawn_record(&e.to_string(), &raw_url, ERROR_LABEL);
            Err(ApiError::ExtractionFailed)
        }
    }
}
