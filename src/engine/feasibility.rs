// ==========================================
// 库存生产系统 - 可生产量计算引擎
// ==========================================
// 输入: 产品的 BOM 行（含原材料当前库存）
// 输出: Feasibility（无 BOM / 最大可生产数量）
// 规则:
//   - BOM 为空 → NoBillOfMaterials
//   - 任一行 库存 <= 0 或 单耗 <= 0 → 0（短路）
//   - 否则 min(floor(库存 / 单耗))
// ==========================================

use crate::domain::material_usage::BomLine;
use crate::domain::production::{Feasibility, FeasibilityResult};
use crate::engine::error::{ProductionError, ProductionResult};
use crate::repository::InventoryStore;

// ==========================================
// FeasibilityCalculator - 可生产量计算器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct FeasibilityCalculator {
    // 无状态引擎,不需要注入依赖
}

impl FeasibilityCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算一组 BOM 行的最大可生产数量
    ///
    /// 纯函数：不读写存储，相同输入恒得相同输出
    pub fn evaluate(&self, lines: &[BomLine]) -> Feasibility {
        if lines.is_empty() {
            return Feasibility::NoBillOfMaterials;
        }

        let mut max_quantity = i64::MAX;
        for line in lines {
            let stock = line.raw_material.available_stock;
            let per_unit = line.consumption_per_unit;

            if stock <= 0 || per_unit <= 0 {
                return Feasibility::Producible { max_quantity: 0 };
            }

            max_quantity = max_quantity.min(stock / per_unit);
        }

        Feasibility::Producible { max_quantity }
    }

    /// 从存储读取产品与 BOM 后计算可生产量
    ///
    /// # 返回
    /// - Err(ProductNotFound): 产品不存在
    pub fn evaluate_product<S: InventoryStore>(
        &self,
        store: &S,
        product_id: i64,
    ) -> ProductionResult<FeasibilityResult> {
        if store.find_product_by_id(product_id)?.is_none() {
            return Err(ProductionError::ProductNotFound { product_id });
        }

        let lines = store.list_bom_lines(product_id)?;
        let feasibility = self.evaluate(&lines);

        tracing::debug!(
            product_id,
            bom_lines = lines.len(),
            ?feasibility,
            "可生产量计算完成"
        );

        Ok(FeasibilityResult::new(product_id, feasibility))
    }
}
