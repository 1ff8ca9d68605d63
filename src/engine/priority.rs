// ==========================================
// 库存生产系统 - 生产检查与优先级排序引擎
// ==========================================
// 职责: 遍历全部产品，汇总可生产量
// 输出:
//   - 生产检查清单: 所有定义了 BOM 的产品（含可生产量 0）
//   - 生产优先级队列: 可生产量 > 0 的产品，按单价降序
// 排序键: unit_price 降序；单价相同保持产品 id 升序（稳定排序）
// ==========================================

use std::cmp::Ordering;
use std::sync::Arc;

use crate::domain::product::Product;
use crate::domain::production::{Feasibility, ProductionCheckEntry, ProductionPriorityEntry};
use crate::engine::error::ProductionResult;
use crate::engine::feasibility::FeasibilityCalculator;
use crate::repository::InventoryStore;

// ==========================================
// PriorityRanker - 生产优先级排序器
// ==========================================
pub struct PriorityRanker<S: InventoryStore> {
    store: Arc<S>,
    calculator: FeasibilityCalculator,
}

impl<S: InventoryStore> PriorityRanker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            calculator: FeasibilityCalculator::new(),
        }
    }

    /// 生产检查清单
    ///
    /// 未定义 BOM 的产品不出现；有 BOM 但库存不足的产品以 0 出现
    pub fn list_production_check(&self) -> ProductionResult<Vec<ProductionCheckEntry>> {
        let entries = self
            .evaluate_all()?
            .into_iter()
            .filter_map(|(product, feasibility)| match feasibility {
                Feasibility::NoBillOfMaterials => None,
                Feasibility::Producible { max_quantity } => Some(ProductionCheckEntry {
                    product_id: product.id,
                    product_name: product.name,
                    max_can_produce: max_quantity,
                }),
            })
            .collect::<Vec<_>>();

        tracing::debug!(count = entries.len(), "生产检查清单已生成");
        Ok(entries)
    }

    /// 生产优先级队列（仅可生产量 > 0，按单价降序）
    pub fn list_production_priority(&self) -> ProductionResult<Vec<ProductionPriorityEntry>> {
        let candidates = self
            .evaluate_all()?
            .into_iter()
            .filter_map(|(product, feasibility)| match feasibility {
                Feasibility::Producible { max_quantity } if max_quantity > 0 => {
                    Some(ProductionPriorityEntry {
                        product_id: product.id,
                        name: product.name,
                        unit_price: product.unit_price,
                        max_quantity,
                    })
                }
                _ => None,
            })
            .collect::<Vec<_>>();

        let ranked = rank_by_unit_price(candidates);
        tracing::debug!(count = ranked.len(), "生产优先级队列已生成");
        Ok(ranked)
    }

    /// 逐个产品计算可生产量（产品按 id 升序）
    fn evaluate_all(&self) -> ProductionResult<Vec<(Product, Feasibility)>> {
        let products = self.store.list_all_products()?;
        let mut evaluated = Vec::with_capacity(products.len());

        for product in products {
            let lines = self.store.list_bom_lines(product.id)?;
            let feasibility = self.calculator.evaluate(&lines);
            evaluated.push((product, feasibility));
        }

        Ok(evaluated)
    }
}

/// 按单价降序的稳定排序
pub fn rank_by_unit_price(mut entries: Vec<ProductionPriorityEntry>) -> Vec<ProductionPriorityEntry> {
    entries.sort_by(compare_priority);
    entries
}

fn compare_priority(a: &ProductionPriorityEntry, b: &ProductionPriorityEntry) -> Ordering {
    b.unit_price.total_cmp(&a.unit_price)
}
