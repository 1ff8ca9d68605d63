// ==========================================
// 库存生产系统 - 生产 API
// ==========================================
// 职责: 对外暴露可生产量、生产检查清单、生产优先级、生产扣料
// 引擎: FeasibilityCalculator / ProductionExecutor / PriorityRanker
// ==========================================

use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::domain::production::{
    FeasibilityResult, ProductionCheckEntry, ProductionPriorityEntry, ProductionReceipt,
};
use crate::engine::{FeasibilityCalculator, PriorityRanker, ProductionExecutor};
use crate::repository::{InventoryStore, SqliteInventoryStore};

// ==========================================
// ProductionApi - 生产 API
// ==========================================
pub struct ProductionApi<S: InventoryStore = SqliteInventoryStore> {
    store: Arc<S>,
    calculator: FeasibilityCalculator,
    executor: ProductionExecutor<S>,
    ranker: PriorityRanker<S>,
}

impl<S: InventoryStore> ProductionApi<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            calculator: FeasibilityCalculator::new(),
            executor: ProductionExecutor::new(store.clone()),
            ranker: PriorityRanker::new(store.clone()),
            store,
        }
    }

    /// 单个产品的可生产量
    ///
    /// # 返回
    /// - Err(NotFound): 产品不存在
    pub fn compute_feasibility(&self, product_id: i64) -> ApiResult<FeasibilityResult> {
        Ok(self
            .calculator
            .evaluate_product(self.store.as_ref(), product_id)?)
    }

    /// 生产检查清单（定义了 BOM 的产品，含可生产量 0）
    pub fn list_production_check(&self) -> ApiResult<Vec<ProductionCheckEntry>> {
        Ok(self.ranker.list_production_check()?)
    }

    /// 生产优先级队列（可生产量 > 0，按单价降序）
    pub fn list_production_priority(&self) -> ApiResult<Vec<ProductionPriorityEntry>> {
        Ok(self.ranker.list_production_priority()?)
    }

    /// 生产并扣减原材料
    ///
    /// # 返回
    /// - Err(NotFound / InvalidInput / NoBillOfMaterials / InsufficientStock)
    pub fn produce(&self, product_id: i64, quantity: i64) -> ApiResult<ProductionReceipt> {
        Ok(self.executor.produce(product_id, quantity)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::db::open_test_connection;
    use crate::repository::{MaterialUsageRepository, ProductRepository, RawMaterialRepository};
    use std::sync::Mutex;

    #[test]
    fn test_compute_feasibility_tracks_produce() {
        let conn = Arc::new(Mutex::new(open_test_connection()));
        let products = ProductRepository::new(conn.clone());
        let materials = RawMaterialRepository::new(conn.clone());
        let usages = MaterialUsageRepository::new(conn.clone());
        let api = ProductionApi::new(Arc::new(SqliteInventoryStore::new(conn)));

        let p = products.insert("P", "Product P", 10.0).unwrap();
        let m = materials.insert("M", "Material M", 10).unwrap();
        usages.insert(p.id, m.id, 2).unwrap();

        let f = api.compute_feasibility(p.id).unwrap();
        assert!(f.producible);
        assert_eq!(f.max_quantity, 5);

        api.produce(p.id, 3).unwrap();
        assert_eq!(api.compute_feasibility(p.id).unwrap().max_quantity, 2);

        match api.produce(p.id, 3) {
            Err(ApiError::InsufficientStock(s)) => assert_eq!(s.missing, 2),
            other => panic!("Expected InsufficientStock, got {:?}", other),
        }

        assert!(matches!(
            api.compute_feasibility(12345),
            Err(ApiError::NotFound(_))
        ));
    }
}
