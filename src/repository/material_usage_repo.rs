// ==========================================
// 库存生产系统 - 物料用量（BOM）数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 引用存在性由 API 层在创建时校验，外键为存储层兜底
// ==========================================

use crate::domain::material_usage::{BomLine, MaterialUsage};
use crate::domain::raw_material::RawMaterial;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::parse_timestamp;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// MaterialUsageRepository - 物料用量仓储
// ==========================================
pub struct MaterialUsageRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaterialUsageRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入一条 BOM 行
    pub fn insert(
        &self,
        product_id: i64,
        raw_material_id: i64,
        consumption_per_unit: i64,
    ) -> RepositoryResult<MaterialUsage> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO material_usage (product_id, raw_material_id, consumption_per_unit)
             VALUES (?1, ?2, ?3)",
            params![product_id, raw_material_id, consumption_per_unit],
        )?;

        Ok(MaterialUsage {
            id: conn.last_insert_rowid(),
            product_id,
            raw_material_id,
            consumption_per_unit,
        })
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<MaterialUsage>> {
        let conn = self.get_conn()?;
        let usage = conn
            .query_row(
                "SELECT id, product_id, raw_material_id, consumption_per_unit
                 FROM material_usage WHERE id = ?1",
                params![id],
                map_row,
            )
            .optional()?;
        Ok(usage)
    }

    /// 查询全部 BOM 行（按 id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<MaterialUsage>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, product_id, raw_material_id, consumption_per_unit
             FROM material_usage ORDER BY id",
        )?;
        let rows = stmt.query_map([], map_row)?;
        let usages = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(usages)
    }

    /// 查询产品的 BOM 行（含原材料当前库存）
    pub fn list_bom_lines(&self, product_id: i64) -> RepositoryResult<Vec<BomLine>> {
        let conn = self.get_conn()?;
        select_bom_lines(&conn, product_id)
    }

    /// 更新单位消耗量
    pub fn update_consumption(
        &self,
        id: i64,
        consumption_per_unit: i64,
    ) -> RepositoryResult<MaterialUsage> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE material_usage SET consumption_per_unit = ?1 WHERE id = ?2",
            params![consumption_per_unit, id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MaterialUsage".to_string(),
                id: id.to_string(),
            });
        }

        let usage = conn.query_row(
            "SELECT id, product_id, raw_material_id, consumption_per_unit
             FROM material_usage WHERE id = ?1",
            params![id],
            map_row,
        )?;
        Ok(usage)
    }

    pub fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM material_usage WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

// ==========================================
// 连接级查询（仓储与事务作用域共用）
// ==========================================

/// 按 BOM 行 id 顺序返回，保证校验顺序稳定（“第一条失败”可复现）
pub(crate) fn select_bom_lines(conn: &Connection, product_id: i64) -> RepositoryResult<Vec<BomLine>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT mu.id, mu.consumption_per_unit,
               rm.id, rm.code, rm.description, rm.available_stock, rm.created_at, rm.updated_at
        FROM material_usage mu
        JOIN raw_material rm ON rm.id = mu.raw_material_id
        WHERE mu.product_id = ?1
        ORDER BY mu.id
        "#,
    )?;

    let rows = stmt.query_map(params![product_id], |row| {
        Ok(BomLine {
            usage_id: row.get(0)?,
            consumption_per_unit: row.get(1)?,
            raw_material: RawMaterial {
                id: row.get(2)?,
                code: row.get(3)?,
                description: row.get(4)?,
                available_stock: row.get(5)?,
                created_at: parse_timestamp(&row.get::<_, String>(6)?),
                updated_at: parse_timestamp(&row.get::<_, String>(7)?),
            },
        })
    })?;

    let lines = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<MaterialUsage> {
    Ok(MaterialUsage {
        id: row.get(0)?,
        product_id: row.get(1)?,
        raw_material_id: row.get(2)?,
        consumption_per_unit: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_test_connection;
    use crate::repository::{ProductRepository, RawMaterialRepository};

    struct Fixture {
        products: ProductRepository,
        materials: RawMaterialRepository,
        usages: MaterialUsageRepository,
    }

    fn setup() -> Fixture {
        let conn = open_test_connection();
        let conn = Arc::new(Mutex::new(conn));
        Fixture {
            products: ProductRepository::new(conn.clone()),
            materials: RawMaterialRepository::new(conn.clone()),
            usages: MaterialUsageRepository::new(conn),
        }
    }

    #[test]
    fn test_list_bom_lines_with_stock() {
        let f = setup();
        let p = f.products.insert("P-1", "Chair", 10.0).unwrap();
        let steel = f.materials.insert("RM-1", "Steel", 10).unwrap();
        let wood = f.materials.insert("RM-2", "Wood", 7).unwrap();
        f.usages.insert(p.id, steel.id, 2).unwrap();
        f.usages.insert(p.id, wood.id, 3).unwrap();

        let lines = f.usages.list_bom_lines(p.id).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].raw_material.description, "Steel");
        assert_eq!(lines[0].raw_material.available_stock, 10);
        assert_eq!(lines[1].consumption_per_unit, 3);

        assert!(f.usages.list_bom_lines(p.id + 100).unwrap().is_empty());
    }

    #[test]
    fn test_referenced_rows_cannot_be_deleted() {
        let f = setup();
        let p = f.products.insert("P-1", "Chair", 10.0).unwrap();
        let steel = f.materials.insert("RM-1", "Steel", 10).unwrap();
        let usage = f.usages.insert(p.id, steel.id, 2).unwrap();

        assert!(matches!(
            f.products.delete_by_id(p.id),
            Err(RepositoryError::ForeignKeyViolation(_))
        ));
        assert!(matches!(
            f.materials.delete_by_id(steel.id),
            Err(RepositoryError::ForeignKeyViolation(_))
        ));

        assert!(f.usages.delete_by_id(usage.id).unwrap());
        assert!(f.products.delete_by_id(p.id).unwrap());
    }

    #[test]
    fn test_update_consumption() {
        let f = setup();
        let p = f.products.insert("P-1", "Chair", 10.0).unwrap();
        let steel = f.materials.insert("RM-1", "Steel", 10).unwrap();
        let usage = f.usages.insert(p.id, steel.id, 2).unwrap();

        let updated = f.usages.update_consumption(usage.id, 5).unwrap();
        assert_eq!(updated.consumption_per_unit, 5);
        assert!(matches!(
            f.usages.update_consumption(999, 1),
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
