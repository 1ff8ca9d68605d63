// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#![allow(dead_code)]

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::Arc;
use tempfile::NamedTempFile;

use inventory_production::api::{
    ApiError, MaterialUsageApi, ProductApi, ProductionApi, RawMaterialApi,
};
use inventory_production::domain::{MaterialUsageView, Product, RawMaterial};
use inventory_production::repository::{
    MaterialUsageRepository, ProductRepository, RawMaterialRepository, SqliteInventoryStore,
};

use super::test_data_builder::{usage, ProductBuilder, RawMaterialBuilder};

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含所有API实例和必要的依赖
pub struct ApiTestEnv {
    pub db_path: String,
    pub product_api: Arc<ProductApi>,
    pub raw_material_api: Arc<RawMaterialApi>,
    pub material_usage_api: Arc<MaterialUsageApi>,
    pub production_api: Arc<ProductionApi>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的测试环境（独立临时数据库）
    pub fn new() -> Result<Self, String> {
        inventory_production::logging::init_test();

        let (temp_file, db_path) =
            test_helpers::create_test_db().map_err(|e| format!("创建测试数据库失败: {}", e))?;
        let conn = test_helpers::open_shared_connection(&db_path)
            .map_err(|e| format!("打开数据库失败: {}", e))?;

        let product_repo = Arc::new(ProductRepository::new(conn.clone()));
        let raw_material_repo = Arc::new(RawMaterialRepository::new(conn.clone()));
        let material_usage_repo = Arc::new(MaterialUsageRepository::new(conn.clone()));
        let store = Arc::new(SqliteInventoryStore::new(conn));

        Ok(Self {
            db_path,
            product_api: Arc::new(ProductApi::new(product_repo.clone())),
            raw_material_api: Arc::new(RawMaterialApi::new(raw_material_repo.clone())),
            material_usage_api: Arc::new(MaterialUsageApi::new(
                material_usage_repo,
                product_repo,
                raw_material_repo,
            )),
            production_api: Arc::new(ProductionApi::new(store)),
            _temp_file: temp_file,
        })
    }

    // ==========================================
    // 测试数据准备
    // ==========================================

    pub fn create_product(&self, code: &str, price: f64) -> Product {
        self.product_api
            .create_product(ProductBuilder::new(code).price(price).build())
            .expect("创建产品失败")
    }

    pub fn create_raw_material(&self, code: &str, stock: i64) -> RawMaterial {
        self.raw_material_api
            .create_raw_material(RawMaterialBuilder::new(code).stock(stock).build())
            .expect("创建原材料失败")
    }

    pub fn add_usage(&self, product_id: i64, raw_material_id: i64, per_unit: i64) -> MaterialUsageView {
        self.material_usage_api
            .create_material_usage(usage(product_id, raw_material_id, per_unit))
            .expect("创建物料用量失败")
    }

    pub fn stock_of(&self, raw_material_id: i64) -> i64 {
        test_helpers::read_stock(&self.db_path, raw_material_id)
    }
}

// ==========================================
// 断言辅助
// ==========================================

pub fn assert_not_found(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::NotFound(_)) => {}
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

pub fn assert_invalid_input(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::InvalidInput(_)) => {}
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}

pub fn assert_conflict(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::Conflict(_)) => {}
        other => panic!("Expected Conflict, got {:?}", other),
    }
}
