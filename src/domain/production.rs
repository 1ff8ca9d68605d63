// ==========================================
// 库存生产系统 - 生产结果领域模型
// ==========================================
// 用途: 引擎输出，API 层直接序列化返回
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Feasibility - 可生产量判定结果
// ==========================================
// 必须区分“未定义 BOM”与“有 BOM 但库存不足（0）”
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    /// 产品没有任何 BOM 行，不可生产
    NoBillOfMaterials,
    /// 有 BOM，最大可生产数量（可能为 0）
    Producible { max_quantity: i64 },
}

impl Feasibility {
    pub fn is_producible(&self) -> bool {
        matches!(self, Feasibility::Producible { .. })
    }

    /// 最大可生产数量；无 BOM 时为 0
    pub fn max_quantity(&self) -> i64 {
        match self {
            Feasibility::NoBillOfMaterials => 0,
            Feasibility::Producible { max_quantity } => *max_quantity,
        }
    }
}

/// 单个产品的可生产量（computeFeasibility 返回）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    pub product_id: i64,
    pub producible: bool,
    pub max_quantity: i64,
}

impl FeasibilityResult {
    pub fn new(product_id: i64, feasibility: Feasibility) -> Self {
        Self {
            product_id,
            producible: feasibility.is_producible(),
            max_quantity: feasibility.max_quantity(),
        }
    }
}

/// 生产检查清单条目（含可生产量为 0 的产品）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCheckEntry {
    pub product_id: i64,
    pub product_name: String,
    pub max_can_produce: i64,
}

/// 生产优先级队列条目（按单价降序）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPriorityEntry {
    pub product_id: i64,
    pub name: String,
    pub unit_price: f64,
    pub max_quantity: i64,
}

/// 生产成功回执
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionReceipt {
    pub product_id: i64,
    pub product_name: String,
    pub quantity_produced: i64,
}

/// 库存不足详情（第一条不满足的 BOM 行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockShortage {
    pub product_id: i64,
    pub product_name: String,
    pub raw_material_id: i64,
    pub raw_material: String,
    pub available: i64,
    pub required: i64,
    pub missing: i64,
}
