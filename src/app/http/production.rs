use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::state::AppState;

use super::common::{path_error, run_blocking, HttpResult, RequestContext};

// ==========================================
// 生产相关处理器
// ==========================================

/// 生产成功响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProduceResponse {
    pub status: String,
    pub product: String,
    pub quantity_produced: i64,
}

/// 单个产品的可生产量
pub(super) async fn compute_feasibility(
    headers: HeaderMap,
    State(state): State<AppState>,
    product_id: Result<Path<i64>, PathRejection>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let Path(product_id) = product_id.map_err(|e| path_error(e, &ctx))?;
    let api = state.production_api.clone();
    let result = run_blocking(&ctx, "http.compute_feasibility", move || {
        api.compute_feasibility(product_id)
    })
    .await?;
    Ok(Json(result))
}

/// 生产并扣减原材料
pub(super) async fn produce(
    headers: HeaderMap,
    State(state): State<AppState>,
    params: Result<Path<(i64, i64)>, PathRejection>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let Path((product_id, quantity)) = params.map_err(|e| path_error(e, &ctx))?;
    info!(request_id = %ctx.request_id, product_id, quantity, "生产请求");

    let api = state.production_api.clone();
    let receipt = run_blocking(&ctx, "http.produce", move || api.produce(product_id, quantity))
        .await?;

    Ok(Json(ProduceResponse {
        status: "SUCCESS".to_string(),
        product: receipt.product_name,
        quantity_produced: receipt.quantity_produced,
    }))
}

/// 生产检查清单
pub(super) async fn list_production_check(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let api = state.production_api.clone();
    let entries = run_blocking(&ctx, "http.list_production_check", move || {
        api.list_production_check()
    })
    .await?;
    Ok(Json(entries))
}

/// 生产优先级队列
pub(super) async fn list_production_priority(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let api = state.production_api.clone();
    let entries = run_blocking(&ctx, "http.list_production_priority", move || {
        api.list_production_priority()
    })
    .await?;
    Ok(Json(entries))
}
