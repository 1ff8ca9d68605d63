// ==========================================
// 库存生产系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换 Repository / 引擎错误为调用方可识别的错误
// 红线: 所有错误带显式原因；任何写入前判定
// ==========================================

use crate::domain::production::StockShortage;
use crate::engine::error::ProductionError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 编码/名称/描述重复（大小写不敏感），或删除仍被引用的记录
    #[error("数据冲突: {0}")]
    Conflict(String),

    #[error("产品未定义物料清单(BOM): product_id={product_id}, name={product_name}")]
    NoBillOfMaterials { product_id: i64, product_name: String },

    #[error(
        "库存不足: product={}, raw_material={}, available={}, required={}, missing={}",
        .0.product_name, .0.raw_material, .0.available, .0.required, .0.missing
    )]
    InsufficientStock(StockShortage),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::Conflict(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::Conflict(format!("记录仍被引用: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::InternalError(err.to_string()),
        }
    }
}

// ==========================================
// 从 ProductionError 转换
// ==========================================
impl From<ProductionError> for ApiError {
    fn from(err: ProductionError) -> Self {
        match err {
            ProductionError::ProductNotFound { product_id } => {
                ApiError::NotFound(format!("Product(id={})不存在", product_id))
            }
            ProductionError::InvalidQuantity { quantity } => ApiError::InvalidInput(format!(
                "quantity must be greater than zero (got {})",
                quantity
            )),
            ProductionError::NoBillOfMaterials {
                product_id,
                product_name,
            } => ApiError::NoBillOfMaterials {
                product_id,
                product_name,
            },
            ProductionError::InsufficientStock(shortage) => ApiError::InsufficientStock(shortage),
            ProductionError::Repository(e) => e.into(),
        }
    }
}

impl ApiError {
    /// 稳定的机器可读错误码（HTTP 响应体 code 字段）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::NoBillOfMaterials { .. } => "NO_BILL_OF_MATERIALS",
            ApiError::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseTransactionError(_) => "DATABASE_TRANSACTION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// 结构化详情（仅部分错误携带）
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::InsufficientStock(shortage) => serde_json::to_value(shortage).ok(),
            ApiError::NoBillOfMaterials {
                product_id,
                product_name,
            } => Some(serde_json::json!({
                "product_id": product_id,
                "product_name": product_name,
            })),
            _ => None,
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
