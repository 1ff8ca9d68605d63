use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::state::AppState;

// ==========================================
// 跨域（CORS）与预检
// ==========================================
// 规则:
//   - 所有响应附带 Allow-Headers / Allow-Methods
//   - Origin 以允许前缀开头时回显，并附带 Vary: Origin
//   - 任意路径的 OPTIONS 直接返回 200，不进入处理器
// ==========================================

pub const ALLOW_HEADERS: &str = "origin, content-type, accept, authorization, x-requested-with";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// CORS 中间件
pub(super) async fn cors_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut response = if request.method() == Method::OPTIONS {
        tracing::debug!(path = %request.uri().path(), "预检请求");
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    apply_cors_headers(
        response.headers_mut(),
        origin.as_deref(),
        &state.cors_origin_prefixes,
    );
    response
}

/// Origin 是否以允许的前缀开头
pub fn origin_allowed(origin: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| origin.starts_with(prefix.as_str()))
}

pub fn apply_cors_headers(headers: &mut HeaderMap, origin: Option<&str>, prefixes: &[String]) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );

    let Some(origin) = origin else {
        return;
    };
    if !origin_allowed(origin, prefixes) {
        return;
    }

    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.append(header::VARY, HeaderValue::from_static("Origin"));
    }
}
