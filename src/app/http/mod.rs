// ==========================================
// 库存生产系统 - HTTP 接口层
// ==========================================
// 职责: 路由装配，请求 → API 调用 → JSON 响应
// 红线: 处理器不含业务规则；同步 API 调用一律进入阻塞线程池
// ==========================================

mod common;
mod cors;
mod material_usage;
mod production;
mod products;
mod raw_materials;

use axum::{
    http::{HeaderMap, StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::app::state::AppState;

pub use common::{status_for, ErrorResponse, HttpError};
pub use cors::{apply_cors_headers, origin_allowed, ALLOW_HEADERS, ALLOW_METHODS};
pub use production::ProduceResponse;

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// 构建完整路由（含 CORS 与预检中间件）
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // 产品
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        // 原材料
        .route(
            "/raw-materials",
            get(raw_materials::list_raw_materials).post(raw_materials::create_raw_material),
        )
        .route(
            "/raw-materials/:id",
            get(raw_materials::get_raw_material)
                .put(raw_materials::update_raw_material)
                .delete(raw_materials::delete_raw_material),
        )
        // 物料用量
        .route(
            "/material-usage",
            get(material_usage::list_material_usages).post(material_usage::create_material_usage),
        )
        .route(
            "/material-usage/:id",
            get(material_usage::get_material_usage)
                .put(material_usage::update_material_usage)
                .delete(material_usage::delete_material_usage),
        )
        // 生产
        .route(
            "/production/:product_id/feasibility",
            get(production::compute_feasibility),
        )
        .route(
            "/production/:product_id/produce/:quantity",
            post(production::produce),
        )
        .route("/production-check", get(production::list_production_check))
        .route(
            "/production-priority",
            get(production::list_production_priority),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), cors::cors_layer))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "UP".to_string(),
        service: crate::APP_NAME.to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn not_found(headers: HeaderMap, uri: Uri) -> impl IntoResponse {
    let ctx = common::RequestContext::from_headers(&headers);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            code: "NOT_FOUND".to_string(),
            message: format!("路由不存在: {}", uri.path()),
            details: None,
            request_id: Some(ctx.request_id),
        }),
    )
}
