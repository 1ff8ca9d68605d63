// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 文件数据库上的持久化、约束与事务作用域
// ==========================================


use inventory_production::db;
use inventory_production::repository::{
    InventoryStore, MaterialUsageRepository, ProductRepository, RawMaterialRepository,
    RepositoryError, SqliteInventoryStore,
};

#[test]
fn test_data_persists_after_reopen() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();

    let product_id = {
        let conn = test_helpers::open_shared_connection(&db_path).unwrap();
        let products = ProductRepository::new(conn.clone());
        let materials = RawMaterialRepository::new(conn.clone());
        let usages = MaterialUsageRepository::new(conn);

        let p = products.insert("P-1", "Chair", 19.5).unwrap();
        let m = materials.insert("RM-1", "Oak", 40).unwrap();
        usages.insert(p.id, m.id, 4).unwrap();
        p.id
    };

    let conn = test_helpers::open_shared_connection(&db_path).unwrap();
    let store = SqliteInventoryStore::new(conn);

    let product = store.find_product_by_id(product_id).unwrap().unwrap();
    assert_eq!(product.name, "Chair");
    assert_eq!(product.unit_price, 19.5);

    let lines = store.list_bom_lines(product_id).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].consumption_per_unit, 4);
    assert_eq!(lines[0].raw_material.available_stock, 40);
}

#[test]
fn test_init_schema_repeated() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let conn = db::open_sqlite_connection(&db_path).unwrap();

    db::init_schema(&conn).unwrap();
    db::init_schema(&conn).unwrap();
    assert_eq!(
        db::read_schema_version(&conn).unwrap(),
        Some(db::CURRENT_SCHEMA_VERSION)
    );
}

#[test]
fn test_store_constraints_backstop() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_shared_connection(&db_path).unwrap();
    let products = ProductRepository::new(conn.clone());
    let materials = RawMaterialRepository::new(conn.clone());
    let usages = MaterialUsageRepository::new(conn);

    products.insert("ABC", "Desk", 1.0).unwrap();

    // COLLATE NOCASE 唯一约束
    assert!(matches!(
        products.insert("abc", "Other", 1.0),
        Err(RepositoryError::UniqueConstraintViolation(_))
    ));

    // CHECK 约束
    assert!(materials.insert("RM", "Neg", -1).is_err());

    // 外键约束
    assert!(matches!(
        usages.insert(9_999, 9_999, 1),
        Err(RepositoryError::ForeignKeyViolation(_))
    ));
}

#[test]
fn test_failed_transaction_leaves_no_writes() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_shared_connection(&db_path).unwrap();
    let materials = RawMaterialRepository::new(conn.clone());
    let a = materials.insert("A", "A", 10).unwrap();
    let b = materials.insert("B", "B", 10).unwrap();

    let store = SqliteInventoryStore::new(conn);
    let result: Result<(), RepositoryError> = store.in_transaction(|tx| {
        tx.update_raw_material_stock(a.id, 0)?;
        // 第二次写入失败（CHECK 约束）
        tx.update_raw_material_stock(b.id, -5)?;
        Ok(())
    });

    assert!(result.is_err());
    assert_eq!(test_helpers::read_stock(&db_path, a.id), 10);
    assert_eq!(test_helpers::read_stock(&db_path, b.id), 10);
}
