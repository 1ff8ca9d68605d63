// ==========================================
// 库存生产系统 - 物料用量（BOM 行）领域模型
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::domain::raw_material::RawMaterial;

// ==========================================
// MaterialUsage - 物料用量
// ==========================================
// 一条 BOM 行: 生产 1 个单位产品消耗多少个单位的某原材料
// 引用关系在创建时校验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialUsage {
    pub id: i64,
    pub product_id: i64,
    pub raw_material_id: i64,
    pub consumption_per_unit: i64, // 单位消耗量（> 0）
}

/// 对外展示用：物料用量 + 已解析的产品与原材料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialUsageView {
    pub id: i64,
    pub product: Product,
    pub raw_material: RawMaterial,
    pub consumption_per_unit: i64,
}

/// BOM 行（物料用量 + 当前原材料快照）
///
/// 可生产量计算与扣料的输入
#[derive(Debug, Clone, PartialEq)]
pub struct BomLine {
    pub usage_id: i64,
    pub consumption_per_unit: i64,
    pub raw_material: RawMaterial,
}

impl BomLine {
    /// 生产 quantity 个单位所需的原材料数量（溢出时饱和到 i64::MAX）
    pub fn required_for(&self, quantity: i64) -> i64 {
        self.consumption_per_unit.saturating_mul(quantity)
    }
}

/// 创建物料用量请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMaterialUsage {
    pub product_id: Option<i64>,
    pub raw_material_id: Option<i64>,
    pub consumption_per_unit: Option<i64>,
}

/// 物料用量部分更新请求（仅允许修改单位消耗量）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialUsagePatch {
    pub consumption_per_unit: Option<i64>,
}
