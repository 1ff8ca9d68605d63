// ==========================================
// 库存生产系统 - 生产引擎数据访问接口
// ==========================================
// 职责: 定义可生产量计算/扣料所需的读写契约，及其 SQLite 实现
// 红线: 引擎只依赖 InventoryStore / StockTransaction，不依赖 rusqlite
// ==========================================

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, TransactionBehavior};

use crate::domain::material_usage::BomLine;
use crate::domain::product::Product;
use crate::domain::raw_material::RawMaterial;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{material_usage_repo, product_repo, raw_material_repo};

// ==========================================
// InventoryStore Trait
// ==========================================
// 实现者: SqliteInventoryStore
pub trait InventoryStore: Send + Sync {
    fn find_product_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;

    fn find_raw_material_by_id(&self, id: i64) -> RepositoryResult<Option<RawMaterial>>;

    /// 全部产品（按 id 升序，排序稳定性依赖此顺序）
    fn list_all_products(&self) -> RepositoryResult<Vec<Product>>;

    /// 产品的 BOM 行（每行已解析出原材料当前库存）
    fn list_bom_lines(&self, product_id: i64) -> RepositoryResult<Vec<BomLine>>;

    /// 在单个原子事务中执行 f
    ///
    /// - f 返回 Ok: 提交
    /// - f 返回 Err 或提交失败: 回滚，所有写入丢弃
    fn in_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn StockTransaction) -> Result<T, E>,
        E: From<RepositoryError>;
}

// ==========================================
// StockTransaction Trait - 事务作用域内的读写
// ==========================================
pub trait StockTransaction {
    fn find_product_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;

    fn list_bom_lines(&self, product_id: i64) -> RepositoryResult<Vec<BomLine>>;

    /// 写入原材料新库存（事务提交前对其他连接不可见）
    fn update_raw_material_stock(&self, id: i64, new_stock: i64) -> RepositoryResult<()>;
}

// ==========================================
// SqliteInventoryStore
// ==========================================
/// 基于共享连接的 InventoryStore 实现
///
/// 事务期间持有连接互斥锁，并以 BEGIN IMMEDIATE 开始，
/// 同进程与跨进程的扣料请求都被串行化。
pub struct SqliteInventoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteInventoryStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl InventoryStore for SqliteInventoryStore {
    fn find_product_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        product_repo::select_by_id(&conn, id)
    }

    fn find_raw_material_by_id(&self, id: i64) -> RepositoryResult<Option<RawMaterial>> {
        let conn = self.get_conn()?;
        raw_material_repo::select_by_id(&conn, id)
    }

    fn list_all_products(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        product_repo::select_all(&conn)
    }

    fn list_bom_lines(&self, product_id: i64) -> RepositoryResult<Vec<BomLine>> {
        let conn = self.get_conn()?;
        material_usage_repo::select_bom_lines(&conn, product_id)
    }

    fn in_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn StockTransaction) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut conn = self.get_conn().map_err(E::from)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| E::from(RepositoryError::DatabaseTransactionError(e.to_string())))?;

        let result = {
            let scope = SqliteStockTransaction { conn: &*tx };
            f(&scope)
        };

        match result {
            Ok(value) => {
                tx.commit().map_err(|e| {
                    E::from(RepositoryError::DatabaseTransactionError(e.to_string()))
                })?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!(error = %rollback_err, "事务回滚失败");
                }
                Err(err)
            }
        }
    }
}

/// 事务作用域：借用正在进行的事务连接
struct SqliteStockTransaction<'a> {
    conn: &'a Connection,
}

impl StockTransaction for SqliteStockTransaction<'_> {
    fn find_product_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        product_repo::select_by_id(self.conn, id)
    }

    fn list_bom_lines(&self, product_id: i64) -> RepositoryResult<Vec<BomLine>> {
        material_usage_repo::select_bom_lines(self.conn, product_id)
    }

    fn update_raw_material_stock(&self, id: i64, new_stock: i64) -> RepositoryResult<()> {
        raw_material_repo::update_stock(self.conn, id, new_stock)
    }
}
