use crate::api::AppState;
use crate::domain::model::{ExecutionMode, JobRecord, JobStatus};
use crate::utils::error::GraasError;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(post_job).put(put_job))
        .route("/jobs/:job_id", get(get_job).delete(delete_job))
}

// body 自行解析，讓格式錯誤也回傳 JSON 描述
fn parse_document(body: &[u8]) -> Result<serde_json::Value, GraasError> {
    serde_json::from_slice(body).map_err(|e| GraasError::InvalidProcessGraph {
        message: format!("request body is not valid JSON: {}", e),
    })
}

/// POST /jobs：在暫時資料庫執行
async fn post_job(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<JobRecord>, GraasError> {
    let document = parse_document(&body)?;
    state
        .jobs
        .submit(document, ExecutionMode::Ephemeral)
        .await
        .map(Json)
}

/// PUT /jobs：結果保留在 mapset
async fn put_job(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<JobRecord>, GraasError> {
    let document = parse_document(&body)?;
    state
        .jobs
        .submit(document, ExecutionMode::Persistent)
        .await
        .map(Json)
}

/// GET /jobs/:job_id
async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<(StatusCode, Json<JobRecord>), GraasError> {
    let record = state.jobs.status(&job_id).await?;
    let code = match record.status {
        JobStatus::Error => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };
    Ok((code, Json(record)))
}

/// DELETE /jobs/:job_id
async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobRecord>, GraasError> {
    state.jobs.delete(&job_id).await.map(Json)
}
