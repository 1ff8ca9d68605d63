// ==========================================
// 库存生产系统 - 生产执行引擎（扣料）
// ==========================================
// 校验顺序（先失败者胜出）:
//   1. 产品存在
//   2. 数量 > 0
//   3. 至少一条 BOM 行
//   4. 每行 单耗 × 数量 <= 该原材料剩余库存（完整预检，任何写入前完成）
//      同一原材料出现在多行时，按行累计扣减后的余额校验
// 执行: 逐行扣减库存（同一原材料累计），结果钳制为 >= 0
// 红线: 校验 + 扣减在同一事务内完成；任一失败则不产生任何扣减
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::material_usage::BomLine;
use crate::domain::product::Product;
use crate::domain::production::{ProductionReceipt, StockShortage};
use crate::engine::error::{ProductionError, ProductionResult};
use crate::repository::{InventoryStore, StockTransaction};

/// 单条原材料扣减计划
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDecrement {
    pub raw_material_id: i64,
    pub previous_stock: i64,
    pub consumed: i64,
    pub new_stock: i64,
}

// ==========================================
// ProductionExecutor - 生产执行器
// ==========================================
pub struct ProductionExecutor<S: InventoryStore> {
    store: Arc<S>,
}

impl<S: InventoryStore> ProductionExecutor<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// 生产 quantity 个单位的产品并扣减原材料库存
    ///
    /// # 返回
    /// - Ok(ProductionReceipt): 生产成功
    /// - Err(ProductNotFound / InvalidQuantity / NoBillOfMaterials / InsufficientStock)
    /// - Err(Repository): 存储失败（事务已回滚）
    pub fn produce(&self, product_id: i64, quantity: i64) -> ProductionResult<ProductionReceipt> {
        let result = self
            .store
            .in_transaction(|tx| execute_in_transaction(tx, product_id, quantity));

        match &result {
            Ok(receipt) => tracing::info!(
                product_id,
                product = %receipt.product_name,
                quantity,
                "生产完成，原材料已扣减"
            ),
            Err(ProductionError::Repository(e)) => tracing::error!(
                product_id,
                quantity,
                error = %e,
                "生产失败：存储错误"
            ),
            Err(e) => tracing::warn!(product_id, quantity, reason = %e, "生产请求被拒绝"),
        }

        result
    }
}

fn execute_in_transaction(
    tx: &dyn StockTransaction,
    product_id: i64,
    quantity: i64,
) -> ProductionResult<ProductionReceipt> {
    let product = tx
        .find_product_by_id(product_id)?
        .ok_or(ProductionError::ProductNotFound { product_id })?;

    if quantity <= 0 {
        return Err(ProductionError::InvalidQuantity { quantity });
    }

    let lines = tx.list_bom_lines(product_id)?;
    if lines.is_empty() {
        return Err(ProductionError::NoBillOfMaterials {
            product_id,
            product_name: product.name,
        });
    }

    check_stock(&product, &lines, quantity).map_err(ProductionError::InsufficientStock)?;

    for decrement in plan_consumption(&lines, quantity) {
        tracing::debug!(
            raw_material_id = decrement.raw_material_id,
            previous_stock = decrement.previous_stock,
            consumed = decrement.consumed,
            new_stock = decrement.new_stock,
            "扣减原材料库存"
        );
        tx.update_raw_material_stock(decrement.raw_material_id, decrement.new_stock)?;
    }

    Ok(ProductionReceipt {
        product_id,
        product_name: product.name,
        quantity_produced: quantity,
    })
}

/// 库存预检：返回第一条不满足的 BOM 行
///
/// available 为该行校验时原材料的剩余量（扣除前面各行对同一原材料的需求）
pub fn check_stock(product: &Product, lines: &[BomLine], quantity: i64) -> Result<(), StockShortage> {
    let mut remaining: HashMap<i64, i64> = HashMap::new();

    for line in lines {
        let required = line.required_for(quantity);
        let available = *remaining
            .entry(line.raw_material.id)
            .or_insert(line.raw_material.available_stock);

        if available < required {
            return Err(StockShortage {
                product_id: product.id,
                product_name: product.name.clone(),
                raw_material_id: line.raw_material.id,
                raw_material: line.raw_material.description.clone(),
                available,
                required,
                missing: required.saturating_sub(available),
            });
        }

        remaining.insert(line.raw_material.id, available - required);
    }
    Ok(())
}

/// 计算每条 BOM 行扣减后的库存（钳制为 >= 0）
///
/// 同一原材料的多行在同一余额上连续扣减，按顺序写入后最终值即为累计结果。
/// 正常流程下钳制不会触发（预检已保证足量），仅作为并发改动的兜底。
pub fn plan_consumption(lines: &[BomLine], quantity: i64) -> Vec<StockDecrement> {
    let mut balances: HashMap<i64, i64> = HashMap::new();

    lines
        .iter()
        .map(|line| {
            let raw_material_id = line.raw_material.id;
            let previous_stock = *balances
                .entry(raw_material_id)
                .or_insert(line.raw_material.available_stock);
            let consumed = line.required_for(quantity);
            let new_stock = previous_stock.saturating_sub(consumed).max(0);
            balances.insert(raw_material_id, new_stock);

            StockDecrement {
                raw_material_id,
                previous_stock,
                consumed,
                new_stock,
            }
        })
        .collect()
}
