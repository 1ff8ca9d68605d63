// ==========================================
// 库存生产系统 - 产品领域模型
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 产品
// ==========================================
// 约束: code / name 大小写不敏感唯一；unit_price >= 0
// 对齐: product 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub code: String,    // 产品编码（唯一）
    pub name: String,    // 产品名称（唯一）
    pub unit_price: f64, // 单价

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 创建产品请求
///
/// 字段均为 Option：缺失与空串分别报 InvalidInput
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: Option<String>,
    pub name: Option<String>,
    pub unit_price: Option<f64>,
}

/// 产品部分更新请求（None 表示不修改）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub unit_price: Option<f64>,
}
