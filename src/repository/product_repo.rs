// ==========================================
// 库存生产系统 - 产品数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::product::Product;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = "id, code, name, unit_price, created_at, updated_at";

// ==========================================
// ProductRepository - 产品仓储
// ==========================================
/// 产品仓储
/// 职责: 管理 product 表的 CRUD 与大小写不敏感查重
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入产品，返回带新 id 的记录
    pub fn insert(&self, code: &str, name: &str, unit_price: f64) -> RepositoryResult<Product> {
        let conn = self.get_conn()?;
        let now = Utc::now();
        conn.execute(
            "INSERT INTO product (code, name, unit_price, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![code, name, unit_price, now.to_rfc3339()],
        )?;

        Ok(Product {
            id: conn.last_insert_rowid(),
            code: code.to_string(),
            name: name.to_string(),
            unit_price,
            created_at: now,
            updated_at: now,
        })
    }

    /// 按 id 查询产品
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        select_by_id(&conn, id)
    }

    /// 查询全部产品（按 id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        select_all(&conn)
    }

    /// 更新产品的 code / name / unit_price，返回更新后的记录
    pub fn update(&self, product: &Product) -> RepositoryResult<Product> {
        let conn = self.get_conn()?;
        let now = Utc::now();
        let affected = conn.execute(
            "UPDATE product SET code = ?1, name = ?2, unit_price = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                product.code,
                product.name,
                product.unit_price,
                now.to_rfc3339(),
                product.id
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Product".to_string(),
                id: product.id.to_string(),
            });
        }

        Ok(Product {
            updated_at: now,
            ..product.clone()
        })
    }

    /// 按 id 删除产品
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 记录不存在
    /// - Err(ForeignKeyViolation): 仍被 BOM 行引用
    pub fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM product WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// 大小写不敏感检查 code 是否已存在（可排除自身 id）
    pub fn exists_by_code_ci(&self, code: &str, exclude_id: Option<i64>) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        exists_ci(&conn, "code", code, exclude_id)
    }

    /// 大小写不敏感检查 name 是否已存在（可排除自身 id）
    pub fn exists_by_name_ci(&self, name: &str, exclude_id: Option<i64>) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        exists_ci(&conn, "name", name, exclude_id)
    }
}

// ==========================================
// 连接级查询（仓储与事务作用域共用）
// ==========================================

pub(crate) fn select_by_id(conn: &Connection, id: i64) -> RepositoryResult<Option<Product>> {
    let sql = format!("SELECT {} FROM product WHERE id = ?1", SELECT_COLUMNS);
    let product = conn.query_row(&sql, params![id], map_row).optional()?;
    Ok(product)
}

pub(crate) fn select_all(conn: &Connection) -> RepositoryResult<Vec<Product>> {
    let sql = format!("SELECT {} FROM product ORDER BY id", SELECT_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_row)?;
    let products = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(products)
}

// column 只接受本模块内的固定列名
fn exists_ci(
    conn: &Connection,
    column: &str,
    value: &str,
    exclude_id: Option<i64>,
) -> RepositoryResult<bool> {
    let sql = format!(
        "SELECT 1 FROM product WHERE lower({col}) = lower(?1) AND (?2 IS NULL OR id <> ?2) LIMIT 1",
        col = column
    );
    let found = conn
        .query_row(&sql, params![value.trim(), exclude_id], |_row| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub(crate) fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        unit_price: row.get(3)?,
        created_at: parse_timestamp(&row.get::<_, String>(4)?),
        updated_at: parse_timestamp(&row.get::<_, String>(5)?),
    })
}

pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .unwrap_or_else(|_| Utc::now())
}
