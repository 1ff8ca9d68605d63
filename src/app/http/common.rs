use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};

// ==========================================
// 公共工具：请求上下文、错误映射、阻塞任务调度
// ==========================================

/// 错误响应（返回给 HTTP 调用方）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// 从请求头提取的上下文
#[derive(Debug, Clone)]
pub(super) struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let request_id = headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Self { request_id }
    }
}

/// 处理器错误：ApiError + 请求 id
#[derive(Debug)]
pub struct HttpError {
    error: ApiError,
    request_id: Option<String>,
}

impl HttpError {
    pub(super) fn new(error: ApiError, ctx: &RequestContext) -> Self {
        Self {
            error,
            request_id: Some(ctx.request_id.clone()),
        }
    }
}

impl From<ApiError> for HttpError {
    fn from(error: ApiError) -> Self {
        Self {
            error,
            request_id: None,
        }
    }
}

pub(super) type HttpResult<T> = Result<T, HttpError>;

/// ApiError → HTTP 状态码
pub fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ApiError::Conflict(_) => StatusCode::CONFLICT,
        ApiError::NoBillOfMaterials { .. } => StatusCode::BAD_REQUEST,
        ApiError::InsufficientStock(_) => StatusCode::BAD_REQUEST,
        ApiError::DatabaseError(_)
        | ApiError::DatabaseTransactionError(_)
        | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = status_for(&self.error);
        if status.is_server_error() {
            tracing::error!(request_id = ?self.request_id, error = %self.error, "请求处理失败");
        }

        let body = ErrorResponse {
            code: self.error.code().to_string(),
            message: self.error.to_string(),
            details: self.error.details(),
            request_id: self.request_id,
        };
        (status, Json(body)).into_response()
    }
}

/// 在阻塞线程池中执行同步 API 调用（rusqlite 为同步 IO）
pub(super) async fn run_blocking<T, F>(
    ctx: &RequestContext,
    op: &'static str,
    f: F,
) -> HttpResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new(op);
        f()
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("任务执行失败: {}", e)))
    .and_then(|result| result)
    .map_err(|e| HttpError::new(e, ctx))
}

/// 路径参数解析失败 → InvalidInput
pub(super) fn path_error(rejection: PathRejection, ctx: &RequestContext) -> HttpError {
    HttpError::new(
        ApiError::InvalidInput(format!("路径参数无效: {}", rejection.body_text())),
        ctx,
    )
}

/// 请求体解析失败 → InvalidInput
pub(super) fn body_error(rejection: JsonRejection, ctx: &RequestContext) -> HttpError {
    HttpError::new(
        ApiError::InvalidInput(format!("请求体无效: {}", rejection.body_text())),
        ctx,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for() {
        assert_eq!(status_for(&ApiError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&ApiError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&ApiError::NoBillOfMaterials {
                product_id: 1,
                product_name: "P".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ApiError::DatabaseError("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_request_id_falls_back_to_uuid() {
        let mut headers = HeaderMap::new();
        let generated = RequestContext::from_headers(&headers);
        assert!(Uuid::parse_str(&generated.request_id).is_ok());

        headers.insert("x-request-id", "req-42".parse().unwrap());
        assert_eq!(RequestContext::from_headers(&headers).request_id, "req-42");
    }
}
