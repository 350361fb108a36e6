use crate::api::AppState;
use crate::domain::model::DataProductInfo;
use crate::utils::error::GraasError;
use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/data/:product_id", get(get_data_product))
}

/// GET /data/:product_id
async fn get_data_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<DataProductInfo>, GraasError> {
    state.data.get(&product_id).await.map(Json)
}
