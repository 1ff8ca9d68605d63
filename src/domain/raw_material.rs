// ==========================================
// 库存生产系统 - 原材料领域模型
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RawMaterial - 原材料
// ==========================================
// 红线: available_stock 永不为负
// 对齐: raw_material 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMaterial {
    pub id: i64,
    pub code: String,         // 原材料编码（唯一）
    pub description: String,  // 描述（唯一）
    pub available_stock: i64, // 可用库存

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 创建原材料请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRawMaterial {
    pub code: Option<String>,
    pub description: Option<String>,
    pub available_stock: Option<i64>,
}

/// 原材料部分更新请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMaterialPatch {
    pub code: Option<String>,
    pub description: Option<String>,
    pub available_stock: Option<i64>,
}
