// ==========================================
// 库存生产系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 统一建表逻辑，init_schema 可重复执行
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection, busy_timeout_ms: u64) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    open_sqlite_connection_with_timeout(db_path, DEFAULT_BUSY_TIMEOUT_MS)
}

/// 打开 SQLite 连接（指定 busy_timeout），并安装 SQL 性能追踪
pub fn open_sqlite_connection_with_timeout(
    db_path: &str,
    busy_timeout_ms: u64,
) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn, busy_timeout_ms)?;
    crate::perf::install_sqlite_tracing(&mut conn);
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 唯一约束使用 COLLATE NOCASE，作为 API 层大小写不敏感查重的存储层兜底。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS product (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL COLLATE NOCASE,
            name TEXT NOT NULL COLLATE NOCASE,
            unit_price REAL NOT NULL CHECK (unit_price >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            CONSTRAINT uk_product_code UNIQUE (code),
            CONSTRAINT uk_product_name UNIQUE (name)
        );

        CREATE TABLE IF NOT EXISTS raw_material (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL COLLATE NOCASE,
            description TEXT NOT NULL COLLATE NOCASE,
            available_stock INTEGER NOT NULL CHECK (available_stock >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            CONSTRAINT uk_raw_material_code UNIQUE (code),
            CONSTRAINT uk_raw_material_description UNIQUE (description)
        );

        CREATE TABLE IF NOT EXISTS material_usage (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL
                REFERENCES product(id) ON DELETE RESTRICT,
            raw_material_id INTEGER NOT NULL
                REFERENCES raw_material(id) ON DELETE RESTRICT,
            consumption_per_unit INTEGER NOT NULL CHECK (consumption_per_unit > 0)
        );

        CREATE INDEX IF NOT EXISTS idx_material_usage_product
            ON material_usage(product_id);
        CREATE INDEX IF NOT EXISTS idx_material_usage_raw_material
            ON material_usage(raw_material_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 单元测试用：内存库 + 统一 PRAGMA + 建表
#[cfg(test)]
pub(crate) fn open_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("内存库打开失败");
    configure_sqlite_connection(&conn, DEFAULT_BUSY_TIMEOUT_MS).expect("PRAGMA 配置失败");
    init_schema(&conn).expect("建表失败");
    conn
}
