// ==========================================
// 库存生产系统 - 配置层
// ==========================================
// 职责: 启动配置加载（环境变量 + 默认值）
// ==========================================

pub mod app_config;

// 重导出
pub use app_config::{config_keys, get_default_db_path, AppConfig, LogFormat};
