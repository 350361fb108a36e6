//! openEO REST surface (axum)

pub mod data_routes;
pub mod job_routes;
pub mod server;

use crate::core::data_product::DataProductService;
use crate::core::jobs::JobService;
use crate::domain::ports::GraasBackend;
use crate::utils::error::GraasError;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub data: DataProductService,
    pub jobs: JobService,
}

impl AppState {
    pub fn new(backend: Arc<dyn GraasBackend>) -> Self {
        Self {
            data: DataProductService::new(backend.clone()),
            jobs: JobService::new(backend),
        }
    }
}

/// 所有錯誤都以 400 與 `{"description": ...}` 回傳
impl IntoResponse for GraasError {
    fn into_response(self) -> Response {
        tracing::warn!("Request failed: {} (Category: {:?})", self, self.category());
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "description": self.to_string() })),
        )
            .into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(capabilities))
        .merge(data_routes::routes())
        .merge(job_routes::routes())
        .fallback(not_found)
        .layer(middleware::map_response(json_error_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// GET /
async fn capabilities() -> Json<serde_json::Value> {
    Json(json!({
        "endpoints": [
            {"path": "/data/{product_id}", "methods": ["GET"]},
            {"path": "/jobs", "methods": ["POST", "PUT"]},
            {"path": "/jobs/{job_id}", "methods": ["GET", "DELETE"]}
        ]
    }))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "description": "Resource not found" })),
    )
}

/// axum 內建的拒絕回應（405、path 解析失敗）改成 `{"description": ...}`
async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let text = String::from_utf8_lossy(&bytes).trim().to_string();
    let description = if text.is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_string()
    } else {
        text
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Response::from_parts(
        parts,
        Body::from(json!({ "description": description }).to_string()),
    )
}
