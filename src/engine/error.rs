// ==========================================
// 库存生产系统 - 生产引擎错误类型
// ==========================================
// 所有错误均在任何写入之前判定，返回给调用方，不吞不记
// ==========================================

use thiserror::Error;

use crate::domain::production::StockShortage;
use crate::repository::error::RepositoryError;

#[derive(Error, Debug)]
pub enum ProductionError {
    #[error("产品不存在: product_id={product_id}")]
    ProductNotFound { product_id: i64 },

    #[error("生产数量必须大于 0: quantity={quantity}")]
    InvalidQuantity { quantity: i64 },

    #[error("产品未定义物料清单(BOM): product_id={product_id}, name={product_name}")]
    NoBillOfMaterials { product_id: i64, product_name: String },

    #[error(
        "库存不足: product={}, raw_material={}, available={}, required={}, missing={}",
        .0.product_name, .0.raw_material, .0.available, .0.required, .0.missing
    )]
    InsufficientStock(StockShortage),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ProductionResult<T> = Result<T, ProductionError>;
