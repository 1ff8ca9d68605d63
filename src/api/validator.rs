// ==========================================
// 库存生产系统 - 请求字段校验
// ==========================================
// 职责: 必填字段、trim 后非空、数值范围校验
// 错误: 一律返回 ApiError::InvalidInput，消息指明字段
// ==========================================

use crate::api::error::{ApiError, ApiResult};

/// 必填字符串：缺失或 trim 后为空均报错，返回 trim 后的值
pub fn required_text(value: Option<&str>, field: &str) -> ApiResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::InvalidInput(format!("{} is required", field))),
    }
}

/// 可选字符串（部分更新）：出现时 trim 后不得为空
pub fn optional_text(value: Option<&str>, field: &str) -> ApiResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) => required_text(Some(v), field).map(Some),
    }
}

/// 单价：有限且 >= 0
pub fn unit_price(value: f64) -> ApiResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::InvalidInput(format!(
            "unit_price must be a non-negative number (got {})",
            value
        )));
    }
    Ok(value)
}

/// 库存：>= 0
pub fn available_stock(value: i64) -> ApiResult<i64> {
    if value < 0 {
        return Err(ApiError::InvalidInput(format!(
            "available_stock must be zero or greater (got {})",
            value
        )));
    }
    Ok(value)
}

/// 单位消耗量：> 0
pub fn consumption_per_unit(value: i64) -> ApiResult<i64> {
    if value <= 0 {
        return Err(ApiError::InvalidInput(format!(
            "consumption_per_unit must be greater than zero (got {})",
            value
        )));
    }
    Ok(value)
}

/// 必填数值字段
pub fn required<T>(value: Option<T>, field: &str) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::InvalidInput(format!("{} is required", field)))
}
