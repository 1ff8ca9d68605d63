use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::app::state::AppState;
use crate::domain::product::{NewProduct, ProductPatch};

use super::common::{body_error, path_error, run_blocking, HttpResult, RequestContext};

// ==========================================
// 产品相关处理器
// ==========================================

/// 查询产品列表
pub(super) async fn list_products(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let product_api = state.product_api.clone();
    let products = run_blocking(&ctx, "http.list_products", move || {
        product_api.list_products()
    })
    .await?;
    Ok(Json(products))
}

/// 查询产品详情
pub(super) async fn get_product(
    headers: HeaderMap,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let Path(id) = id.map_err(|e| path_error(e, &ctx))?;
    let product_api = state.product_api.clone();
    let product = run_blocking(&ctx, "http.get_product", move || product_api.get_product(id)).await?;
    Ok(Json(product))
}

/// 创建产品（201 + Location）
pub(super) async fn create_product(
    headers: HeaderMap,
    State(state): State<AppState>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let Json(request) = body.map_err(|e| body_error(e, &ctx))?;
    info!(request_id = %ctx.request_id, "创建产品");

    let product_api = state.product_api.clone();
    let product = run_blocking(&ctx, "http.create_product", move || {
        product_api.create_product(request)
    })
    .await?;

    let location = format!("/products/{}", product.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(product)))
}

/// 部分更新产品
pub(super) async fn update_product(
    headers: HeaderMap,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let Path(id) = id.map_err(|e| path_error(e, &ctx))?;
    let Json(patch) = body.map_err(|e| body_error(e, &ctx))?;
    info!(request_id = %ctx.request_id, product_id = id, "更新产品");

    let product_api = state.product_api.clone();
    let product = run_blocking(&ctx, "http.update_product", move || {
        product_api.update_product(id, patch)
    })
    .await?;
    Ok(Json(product))
}

/// 删除产品（204）
pub(super) async fn delete_product(
    headers: HeaderMap,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> HttpResult<StatusCode> {
    let ctx = RequestContext::from_headers(&headers);
    let Path(id) = id.map_err(|e| path_error(e, &ctx))?;
    info!(request_id = %ctx.request_id, product_id = id, "删除产品");

    let product_api = state.product_api.clone();
    run_blocking(&ctx, "http.delete_product", move || product_api.delete_product(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
