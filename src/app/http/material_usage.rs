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
use crate::domain::material_usage::{MaterialUsagePatch, NewMaterialUsage};

use super::common::{body_error, path_error, run_blocking, HttpResult, RequestContext};

// ==========================================
// 物料用量（BOM 行）相关处理器
// ==========================================

pub(super) async fn list_material_usages(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let api = state.material_usage_api.clone();
    let usages = run_blocking(&ctx, "http.list_material_usages", move || {
        api.list_material_usages()
    })
    .await?;
    Ok(Json(usages))
}

pub(super) async fn get_material_usage(
    headers: HeaderMap,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let Path(id) = id.map_err(|e| path_error(e, &ctx))?;
    let api = state.material_usage_api.clone();
    let usage = run_blocking(&ctx, "http.get_material_usage", move || {
        api.get_material_usage(id)
    })
    .await?;
    Ok(Json(usage))
}

pub(super) async fn create_material_usage(
    headers: HeaderMap,
    State(state): State<AppState>,
    body: Result<Json<NewMaterialUsage>, JsonRejection>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let Json(request) = body.map_err(|e| body_error(e, &ctx))?;
    info!(request_id = %ctx.request_id, "创建物料用量");

    let api = state.material_usage_api.clone();
    let usage = run_blocking(&ctx, "http.create_material_usage", move || {
        api.create_material_usage(request)
    })
    .await?;

    let location = format!("/material-usage/{}", usage.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(usage)))
}

/// 仅更新单位消耗量
pub(super) async fn update_material_usage(
    headers: HeaderMap,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<MaterialUsagePatch>, JsonRejection>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let Path(id) = id.map_err(|e| path_error(e, &ctx))?;
    let Json(patch) = body.map_err(|e| body_error(e, &ctx))?;
    info!(request_id = %ctx.request_id, usage_id = id, "更新物料用量");

    let api = state.material_usage_api.clone();
    let usage = run_blocking(&ctx, "http.update_material_usage", move || {
        api.update_material_usage(id, patch)
    })
    .await?;
    Ok(Json(usage))
}

pub(super) async fn delete_material_usage(
    headers: HeaderMap,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> HttpResult<StatusCode> {
    let ctx = RequestContext::from_headers(&headers);
    let Path(id) = id.map_err(|e| path_error(e, &ctx))?;
    info!(request_id = %ctx.request_id, usage_id = id, "删除物料用量");

    let api = state.material_usage_api.clone();
    run_blocking(&ctx, "http.delete_material_usage", move || {
        api.delete_material_usage(id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
