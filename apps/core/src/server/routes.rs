use super::AppState;
use crate::brain::ChatReply;
use crate::error::AppError;
use crate::models::{CategoryCount, Faq, FaqCategory, FaqSuggestion};
use crate::store::StoreKind;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use tokio::time::timeout;
use tracing::{error, warn};

const DEFAULT_SEARCH_LIMIT: usize = 10;
const DEFAULT_POPULAR_LIMIT: usize = 5;
const DEFAULT_SUGGESTION_LIMIT: usize = 4;
const MAX_LIMIT: usize = 50;

/// Envelope of every JSON endpoint except feedback.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// `AppError` rendered as a `success: false` envelope.
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ReadOnly => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Feedback is temporarily unavailable".to_string(),
            ),
            AppError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "Request timed out".to_string()),
            other => {
                error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

/// Turns a handler panic into a 500 `success: false` envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Request handler panicked: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::failure("Internal server error")),
    )
        .into_response()
}

fn clamp_limit(limit: Option<usize>, default: usize) -> usize {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

// --- Chat ---

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
}

/// Missing or `null` messages are rejected; any other non-string value is
/// treated as empty text.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse<ChatReply>>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected chat payload: {}", rejection);
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure("Invalid request body")),
            );
        }
    };

    let text = match request.message {
        None | Some(Value::Null) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure("Message is required")),
            )
        }
        Some(Value::String(text)) => text,
        Some(_) => String::new(),
    };

    // a panic while answering ends the task, not the connection
    let assistant = state.assistant.clone();
    let reply = match tokio::spawn(async move { assistant.respond(&text).await }).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Chat task failed: {}", e);
            state.assistant.error_reply()
        }
    };
    (StatusCode::OK, Json(ApiResponse::ok(reply)))
}

// --- Feedback ---

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: String,
    pub helpful_count: i64,
}

pub async fn mark_helpful(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let helpful_count = state.assistant.store().increment_helpful_count(&id).await?;
    Ok(Json(FeedbackResponse {
        success: true,
        message: "Cảm ơn phản hồi của bạn!".to_string(),
        helpful_count,
    }))
}

// --- Listings ---

pub async fn categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryCount>> {
    let counts = state.assistant.store().category_counts().await?;
    Ok(Json(ApiResponse::ok(counts)))
}

pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Vec<Faq>> {
    let category: FaqCategory = category.parse()?;
    let faqs = state.assistant.store().find_by_category(category).await?;
    Ok(Json(ApiResponse::ok(faqs)))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<Faq>> {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(AppError::Validation("Query parameter 'q' is required".to_string()).into());
    }
    let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT);
    let faqs = state.assistant.store().search(&query, limit).await?;
    Ok(Json(ApiResponse::ok(faqs)))
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> ApiResult<Vec<Faq>> {
    let limit = clamp_limit(params.limit, DEFAULT_POPULAR_LIMIT);
    let faqs = state.assistant.store().popular(limit).await?;
    Ok(Json(ApiResponse::ok(faqs)))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    pub limit: Option<usize>,
    pub exclude: Option<String>,
}

pub async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionParams>,
) -> ApiResult<Vec<FaqSuggestion>> {
    let limit = clamp_limit(params.limit, DEFAULT_SUGGESTION_LIMIT);
    let sample = state
        .assistant
        .store()
        .sample_random(limit, params.exclude.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(sample)))
}

// --- Health ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub store: StoreKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_faqs: Option<usize>,
}

/// Returns 200 while the store answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.assistant.store();
    let active = timeout(state.assistant.store_timeout(), store.find_active())
        .await
        .map_err(AppError::from)
        .and_then(|read| read);
    match active {
        Ok(faqs) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                store: store.kind(),
                active_faqs: Some(faqs.len()),
            }),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    store: store.kind(),
                    active_faqs: None,
                }),
            )
        }
    }
}
