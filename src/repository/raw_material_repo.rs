// ==========================================
// 库存生产系统 - 原材料数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::raw_material::RawMaterial;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::parse_timestamp;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = "id, code, description, available_stock, created_at, updated_at";

// ==========================================
// RawMaterialRepository - 原材料仓储
// ==========================================
pub struct RawMaterialRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RawMaterialRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入原材料，返回带新 id 的记录
    pub fn insert(
        &self,
        code: &str,
        description: &str,
        available_stock: i64,
    ) -> RepositoryResult<RawMaterial> {
        let conn = self.get_conn()?;
        let now = Utc::now();
        conn.execute(
            "INSERT INTO raw_material (code, description, available_stock, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![code, description, available_stock, now.to_rfc3339()],
        )?;

        Ok(RawMaterial {
            id: conn.last_insert_rowid(),
            code: code.to_string(),
            description: description.to_string(),
            available_stock,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<RawMaterial>> {
        let conn = self.get_conn()?;
        select_by_id(&conn, id)
    }

    /// 查询全部原材料（按 id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<RawMaterial>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM raw_material ORDER BY id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_row)?;
        let materials = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(materials)
    }

    /// 更新原材料的 code / description / available_stock
    pub fn update(&self, material: &RawMaterial) -> RepositoryResult<RawMaterial> {
        let conn = self.get_conn()?;
        let now = Utc::now();
        let affected = conn.execute(
            "UPDATE raw_material SET code = ?1, description = ?2, available_stock = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                material.code,
                material.description,
                material.available_stock,
                now.to_rfc3339(),
                material.id
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "RawMaterial".to_string(),
                id: material.id.to_string(),
            });
        }

        Ok(RawMaterial {
            updated_at: now,
            ..material.clone()
        })
    }

    /// 按 id 删除原材料（被 BOM 引用时返回 ForeignKeyViolation）
    pub fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM raw_material WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn exists_by_code_ci(&self, code: &str, exclude_id: Option<i64>) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        exists_ci(&conn, "code", code, exclude_id)
    }

    pub fn exists_by_description_ci(
        &self,
        description: &str,
        exclude_id: Option<i64>,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        exists_ci(&conn, "description", description, exclude_id)
    }
}

// ==========================================
// 连接级查询（仓储与事务作用域共用）
// ==========================================

pub(crate) fn select_by_id(conn: &Connection, id: i64) -> RepositoryResult<Option<RawMaterial>> {
    let sql = format!("SELECT {} FROM raw_material WHERE id = ?1", SELECT_COLUMNS);
    let material = conn.query_row(&sql, params![id], map_row).optional()?;
    Ok(material)
}

/// 写入新库存；调用方负责保证 new_stock >= 0（表上另有 CHECK 兜底）
pub(crate) fn update_stock(conn: &Connection, id: i64, new_stock: i64) -> RepositoryResult<()> {
    let affected = conn.execute(
        "UPDATE raw_material SET available_stock = ?1, updated_at = ?2 WHERE id = ?3",
        params![new_stock, Utc::now().to_rfc3339(), id],
    )?;

    if affected == 0 {
        return Err(RepositoryError::NotFound {
            entity: "RawMaterial".to_string(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn exists_ci(
    conn: &Connection,
    column: &str,
    value: &str,
    exclude_id: Option<i64>,
) -> RepositoryResult<bool> {
    let sql = format!(
        "SELECT 1 FROM raw_material WHERE lower({col}) = lower(?1) AND (?2 IS NULL OR id <> ?2) LIMIT 1",
        col = column
    );
    let found = conn
        .query_row(&sql, params![value.trim(), exclude_id], |_row| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub(crate) fn map_row(row: &rusqlite::Row) -> rusqlite::Result<RawMaterial> {
    Ok(RawMaterial {
        id: row.get(0)?,
        code: row.get(1)?,
        description: row.get(2)?,
        available_stock: row.get(3)?,
        created_at: parse_timestamp(&row.get::<_, String>(4)?),
        updated_at: parse_timestamp(&row.get::<_, String>(5)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_test_connection;

    fn setup() -> (Arc<Mutex<Connection>>, RawMaterialRepository) {
        let conn = open_test_connection();
        let conn = Arc::new(Mutex::new(conn));
        (conn.clone(), RawMaterialRepository::new(conn))
    }

    #[test]
    fn test_insert_list_exists() {
        let (_conn, repo) = setup();
        repo.insert("RM-1", "Steel", 100).unwrap();
        repo.insert("RM-2", "Wood", 50).unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].code, "RM-1");

        assert!(repo.exists_by_code_ci("rm-1", None).unwrap());
        assert!(repo.exists_by_description_ci("WOOD", None).unwrap());
        assert!(!repo.exists_by_description_ci("Glass", None).unwrap());
    }

    #[test]
    fn test_update_stock() {
        let (conn, repo) = setup();
        let rm = repo.insert("RM-1", "Steel", 100).unwrap();

        {
            let guard = conn.lock().unwrap();
            update_stock(&guard, rm.id, 40).unwrap();
            assert!(matches!(
                update_stock(&guard, 999, 1),
                Err(RepositoryError::NotFound { .. })
            ));
        }

        assert_eq!(repo.find_by_id(rm.id).unwrap().unwrap().available_stock, 40);
    }

    #[test]
    fn test_negative_stock_rejected_by_check() {
        let (conn, repo) = setup();
        let rm = repo.insert("RM-1", "Steel", 100).unwrap();

        let guard = conn.lock().unwrap();
        let err = update_stock(&guard, rm.id, -1).unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
    }
}
