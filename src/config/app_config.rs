// ==========================================
// 库存生产系统 - 应用配置
// ==========================================
// 来源: 环境变量（未设置或非法时回退默认值并告警）
// ==========================================

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::db::DEFAULT_BUSY_TIMEOUT_MS;

/// 配置键（环境变量名）
pub mod config_keys {
    // 存储
    pub const DB_PATH: &str = "INVENTORY_DB_PATH";
    pub const BUSY_TIMEOUT_MS: &str = "INVENTORY_BUSY_TIMEOUT_MS";

    // HTTP
    pub const BIND_ADDR: &str = "INVENTORY_BIND_ADDR";
    pub const CORS_ORIGIN_PREFIXES: &str = "INVENTORY_CORS_ORIGIN_PREFIXES";

    // 性能追踪
    pub const PERF_SQL: &str = "INVENTORY_PERF_SQL";
    pub const SLOW_SQL_MS: &str = "INVENTORY_SLOW_SQL_MS";

    // 日志
    pub const LOG_FORMAT: &str = "INVENTORY_LOG_FORMAT";
}

/// 默认监听地址
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// 默认允许的跨域来源前缀（仅本机开发）
pub const DEFAULT_CORS_ORIGIN_PREFIXES: &[&str] = &["http://localhost:", "http://127.0.0.1:"];

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人类可读的文本格式
    #[default]
    Text,
    /// 结构化 JSON（每行一条事件）
    Json,
}

impl LogFormat {
    /// 解析配置值；无法识别时返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "text" | "plain" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite 数据库文件路径
    pub db_path: String,
    /// HTTP 监听地址
    pub bind_addr: SocketAddr,
    /// 允许回显的 Origin 前缀
    pub cors_origin_prefixes: Vec<String>,
    /// SQLite busy_timeout（毫秒）
    pub busy_timeout_ms: u64,
    /// 是否开启 SQL 计数/慢 SQL 日志
    pub perf_sql: bool,
    /// 慢 SQL 阈值（毫秒）
    pub slow_sql_ms: u64,
    /// 日志输出格式
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "./inventory.db".to_string(),
            bind_addr: default_bind_addr(),
            cors_origin_prefixes: DEFAULT_CORS_ORIGIN_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            perf_sql: cfg!(debug_assertions),
            slow_sql_ms: if cfg!(debug_assertions) { 50 } else { 200 },
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok());
        if std::env::var(config_keys::DB_PATH).is_err() {
            config.db_path = get_default_db_path();
        }
        config
    }

    /// 从任意键值来源加载配置（测试时可注入）
    ///
    /// 未提供 DB 路径时保持默认值 `./inventory.db`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(path) = get(config_keys::DB_PATH) {
            config.db_path = path;
        }

        if let Some(raw) = get(config_keys::BIND_ADDR) {
            match raw.parse::<SocketAddr>() {
                Ok(addr) => config.bind_addr = addr,
                Err(e) => tracing::warn!(
                    key = config_keys::BIND_ADDR,
                    value = %raw,
                    error = %e,
                    "监听地址非法，使用默认值"
                ),
            }
        }

        if let Some(raw) = get(config_keys::CORS_ORIGIN_PREFIXES) {
            let prefixes: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !prefixes.is_empty() {
                config.cors_origin_prefixes = prefixes;
            }
        }

        if let Some(raw) = get(config_keys::BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms = parse_u64_or(config_keys::BUSY_TIMEOUT_MS, &raw, config.busy_timeout_ms);
        }

        if let Some(raw) = get(config_keys::PERF_SQL) {
            config.perf_sql = is_true(&raw);
        }

        if let Some(raw) = get(config_keys::SLOW_SQL_MS) {
            config.slow_sql_ms = parse_u64_or(config_keys::SLOW_SQL_MS, &raw, config.slow_sql_ms);
        }

        if let Some(raw) = get(config_keys::LOG_FORMAT) {
            match LogFormat::parse(&raw) {
                Some(format) => config.log_format = format,
                None => tracing::warn!(
                    key = config_keys::LOG_FORMAT,
                    value = %raw,
                    "日志格式非法，使用默认值"
                ),
            }
        }

        config
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn parse_u64_or(key: &str, raw: &str, default: u64) -> u64 {
    match raw.parse::<u64>() {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "配置值非法，使用默认值");
            default
        }
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 INVENTORY_DB_PATH（若设置）
/// - 用户数据目录/inventory-production/inventory.db
/// - 无法获取数据目录时回退 ./inventory.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(config_keys::DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./inventory.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("inventory-production");
        // 目录创建失败时保留回退路径
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("inventory.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.db_path, "./inventory.db");
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.cors_origin_prefixes.len(), 2);
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (config_keys::DB_PATH, " /tmp/inv.db "),
            (config_keys::BIND_ADDR, "0.0.0.0:9000"),
            (config_keys::CORS_ORIGIN_PREFIXES, "https://erp.example.com, ,http://localhost:"),
            (config_keys::BUSY_TIMEOUT_MS, "250"),
            (config_keys::PERF_SQL, "on"),
            (config_keys::SLOW_SQL_MS, "10"),
            (config_keys::LOG_FORMAT, " JSON "),
        ]));

        assert_eq!(config.db_path, "/tmp/inv.db");
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(
            config.cors_origin_prefixes,
            vec!["https://erp.example.com".to_string(), "http://localhost:".to_string()]
        );
        assert_eq!(config.busy_timeout_ms, 250);
        assert!(config.perf_sql);
        assert_eq!(config.slow_sql_ms, 10);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_from_lookup_invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (config_keys::BIND_ADDR, "not-an-addr"),
            (config_keys::BUSY_TIMEOUT_MS, "-5"),
            (config_keys::LOG_FORMAT, "xml"),
        ]));

        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
    }
}
