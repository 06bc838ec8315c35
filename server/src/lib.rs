use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use review_core::export::ExportFile;
use review_core::input::{sample_texts, InputSource};
use review_core::normalizer::normalize_value;
use review_core::pipeline::{AnalysisReport, AnalysisSummary, Analyzer, AnalyzerConfig};
use review_core::{AnalysisError, Sentiment, SentimentRow, TopicRow};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Text,
    Csv,
    Sample,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub mode: InputMode,
    /// Review lines for `text`, CSV content for `csv`; ignored for `sample`.
    #[serde(default)]
    pub text: String,
}

impl AnalyzeRequest {
    fn into_source(self) -> InputSource {
        match self.mode {
            InputMode::Text => InputSource::Lines(self.text),
            InputMode::Csv => InputSource::Csv(self.text),
            InputMode::Sample => InputSource::Sample,
        }
    }
}

#[derive(Deserialize)]
pub struct PreprocessRequest {
    pub texts: Vec<serde_json::Value>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub summary: AnalysisSummary,
    pub cleaned: Vec<String>,
    pub sentiment: Vec<SentimentRow>,
    pub positive_topics: Vec<TopicRow>,
    pub negative_topics: Vec<TopicRow>,
}

impl AnalyzeResponse {
    fn new(report: &AnalysisReport, analyzer: &Analyzer) -> Self {
        Self {
            summary: report.summary(analyzer.labels()),
            cleaned: report.cleaned.clone(),
            sentiment: report.sentiment_rows(),
            positive_topics: report.topic_rows(Sentiment::Positive),
            negative_topics: report.topic_rows(Sentiment::Negative),
        }
    }
}

/// Models are loaded once at startup; the last report is kept so views can be redrawn without inference.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub latest: Arc<RwLock<Option<AnalysisReport>>>,
}

pub struct ApiError(AnalysisError);

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, key) = match &self.0 {
            AnalysisError::InputValidation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "warning"),
            AnalysisError::ModelUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "error"),
            AnalysisError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "error"),
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let mut body = serde_json::Map::new();
        body.insert(key.to_string(), serde_json::Value::String(self.0.to_string()));
        (status, Json(serde_json::Value::Object(body))).into_response()
    }
}

pub fn build_app(config: AnalyzerConfig) -> Result<Router> {
    let analyzer = Analyzer::load(&config)?;
    Ok(router(analyzer))
}

pub fn router(analyzer: Analyzer) -> Router {
    let app_state = AppState { analyzer: Arc::new(analyzer), latest: Arc::new(RwLock::new(None)) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/samples", get(samples_handler))
        .route("/preprocess", post(preprocess_handler))
        .route("/analyze", post(analyze_handler))
        .route("/analyze/csv", post(analyze_csv_handler))
        .route("/results", get(results_handler))
        .route("/export/:file", get(export_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn samples_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "texts": sample_texts() }))
}

/// Non-string entries are echoed back unchanged.
async fn preprocess_handler(Json(req): Json<PreprocessRequest>) -> Json<serde_json::Value> {
    let cleaned: Vec<serde_json::Value> = req.texts.iter().cloned().map(normalize_value).collect();
    Json(serde_json::json!({ "original": req.texts, "cleaned": cleaned }))
}

pub async fn analyze_handler(State(state): State<AppState>, Json(req): Json<AnalyzeRequest>) -> Result<Json<AnalyzeResponse>, ApiError> {
    run_analysis(state, req.into_source()).await
}

/// Raw CSV upload; the body must have a `Text` column.
pub async fn analyze_csv_handler(State(state): State<AppState>, body: String) -> Result<Json<AnalyzeResponse>, ApiError> {
    run_analysis(state, InputSource::Csv(body)).await
}

async fn run_analysis(state: AppState, source: InputSource) -> Result<Json<AnalyzeResponse>, ApiError> {
    let start = std::time::Instant::now();
    let reviews = source.into_reviews()?;
    let analyzer = state.analyzer.clone();
    let report = tokio::task::spawn_blocking(move || analyzer.analyze(reviews))
        .await
        .map_err(|e| AnalysisError::model(format!("inference task failed: {e}")))??;

    let response = AnalyzeResponse::new(&report, &state.analyzer);
    *state.latest.write() = Some(report);
    tracing::info!(took_s = start.elapsed().as_secs_f64(), total = response.sentiment.len(), "analysis served");
    Ok(Json(response))
}

pub async fn results_handler(State(state): State<AppState>) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<serde_json::Value>)> {
    match state.latest.read().as_ref() {
        Some(report) => Ok(Json(AnalyzeResponse::new(report, &state.analyzer))),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "no analysis has been run yet" })))),
    }
}

pub async fn export_handler(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    let Some(which) = ExportFile::from_file_name(&file) else {
        return (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "unknown export" }))).into_response();
    };
    let bytes = {
        let latest = state.latest.read();
        let Some(report) = latest.as_ref() else {
            return (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "no analysis has been run yet" }))).into_response();
        };
        let polarity = match which {
            ExportFile::Sentiment => None,
            ExportFile::PositiveTopics => Some(Sentiment::Positive),
            ExportFile::NegativeTopics => Some(Sentiment::Negative),
        };
        if polarity.is_some_and(|p| report.topic_rows(p).is_empty()) {
            return (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "no reviews with this sentiment" }))).into_response();
        }
        report.export_rows(which)
    };
    match bytes {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", which.file_name())),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}
