// ==========================================
// 库存生产系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{MaterialUsageApi, ProductApi, ProductionApi, RawMaterialApi};
use crate::config::AppConfig;
use crate::db;
use crate::repository::{
    MaterialUsageRepository, ProductRepository, RawMaterialRepository, SqliteInventoryStore,
};

/// 应用状态
///
/// 包含所有API实例和共享资源；所有仓储共享同一个连接
#[derive(Clone)]
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 允许回显的跨域来源前缀
    pub cors_origin_prefixes: Arc<Vec<String>>,

    pub product_api: Arc<ProductApi>,
    pub raw_material_api: Arc<RawMaterialApi>,
    pub material_usage_api: Arc<MaterialUsageApi>,
    pub production_api: Arc<ProductionApi>,
}

impl AppState {
    /// 根据配置打开数据库、初始化表结构并装配 API
    ///
    /// # 返回
    /// - Err(String): 数据库无法打开或表结构初始化失败
    pub fn new(config: &AppConfig) -> Result<Self, String> {
        tracing::info!(db_path = %config.db_path, "初始化AppState");

        let conn = db::open_sqlite_connection_with_timeout(&config.db_path, config.busy_timeout_ms)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        db::init_schema(&conn).map_err(|e| format!("数据库表结构初始化失败: {}", e))?;

        Ok(Self::from_connection(
            config.db_path.clone(),
            conn,
            config.cors_origin_prefixes.clone(),
        ))
    }

    /// 从已初始化的连接装配（测试与嵌入场景）
    pub fn from_connection(
        db_path: String,
        conn: Connection,
        cors_origin_prefixes: Vec<String>,
    ) -> Self {
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let product_repo = Arc::new(ProductRepository::new(conn.clone()));
        let raw_material_repo = Arc::new(RawMaterialRepository::new(conn.clone()));
        let material_usage_repo = Arc::new(MaterialUsageRepository::new(conn.clone()));
        let inventory_store = Arc::new(SqliteInventoryStore::new(conn));

        // ==========================================
        // 初始化API层
        // ==========================================
        let product_api = Arc::new(ProductApi::new(product_repo.clone()));
        let raw_material_api = Arc::new(RawMaterialApi::new(raw_material_repo.clone()));
        let material_usage_api = Arc::new(MaterialUsageApi::new(
            material_usage_repo,
            product_repo,
            raw_material_repo,
        ));
        let production_api = Arc::new(ProductionApi::new(inventory_store));

        tracing::info!("AppState初始化完成");

        Self {
            db_path,
            cors_origin_prefixes: Arc::new(cors_origin_prefixes),
            product_api,
            raw_material_api,
            material_usage_api,
            production_api,
        }
    }
}
