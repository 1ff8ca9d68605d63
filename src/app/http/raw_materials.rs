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
use crate::domain::raw_material::{NewRawMaterial, RawMaterialPatch};

use super::common::{body_error, path_error, run_blocking, HttpResult, RequestContext};

// ==========================================
// 原材料相关处理器
// ==========================================

pub(super) async fn list_raw_materials(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let api = state.raw_material_api.clone();
    let materials =
        run_blocking(&ctx, "http.list_raw_materials", move || api.list_raw_materials()).await?;
    Ok(Json(materials))
}

pub(super) async fn get_raw_material(
    headers: HeaderMap,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let Path(id) = id.map_err(|e| path_error(e, &ctx))?;
    let api = state.raw_material_api.clone();
    let material =
        run_blocking(&ctx, "http.get_raw_material", move || api.get_raw_material(id)).await?;
    Ok(Json(material))
}

pub(super) async fn create_raw_material(
    headers: HeaderMap,
    State(state): State<AppState>,
    body: Result<Json<NewRawMaterial>, JsonRejection>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let Json(request) = body.map_err(|e| body_error(e, &ctx))?;
    info!(request_id = %ctx.request_id, "创建原材料");

    let api = state.raw_material_api.clone();
    let material = run_blocking(&ctx, "http.create_raw_material", move || {
        api.create_raw_material(request)
    })
    .await?;

    let location = format!("/raw-materials/{}", material.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(material)))
}

pub(super) async fn update_raw_material(
    headers: HeaderMap,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<RawMaterialPatch>, JsonRejection>,
) -> HttpResult<impl IntoResponse> {
    let ctx = RequestContext::from_headers(&headers);
    let Path(id) = id.map_err(|e| path_error(e, &ctx))?;
    let Json(patch) = body.map_err(|e| body_error(e, &ctx))?;
    info!(request_id = %ctx.request_id, raw_material_id = id, "更新原材料");

    let api = state.raw_material_api.clone();
    let material = run_blocking(&ctx, "http.update_raw_material", move || {
        api.update_raw_material(id, patch)
    })
    .await?;
    Ok(Json(material))
}

pub(super) async fn delete_raw_material(
    headers: HeaderMap,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> HttpResult<StatusCode> {
    let ctx = RequestContext::from_headers(&headers);
    let Path(id) = id.map_err(|e| path_error(e, &ctx))?;
    info!(request_id = %ctx.request_id, raw_material_id = id, "删除原材料");

    let api = state.raw_material_api.clone();
    run_blocking(&ctx, "http.delete_raw_material", move || {
        api.delete_raw_material(id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
