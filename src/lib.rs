// ==========================================
// 库存生产系统 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 原材料库存 + 产品 BOM + 生产可行性与扣料
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与请求
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/表结构）
pub mod db;

// 日志系统
pub mod logging;

// 性能追踪
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    BomLine, Feasibility, FeasibilityResult, MaterialUsage, Product, ProductionCheckEntry,
    ProductionPriorityEntry, ProductionReceipt, RawMaterial, StockShortage,
};

// 引擎
pub use engine::{FeasibilityCalculator, PriorityRanker, ProductionError, ProductionExecutor};

// API
pub use api::{ApiError, ApiResult, MaterialUsageApi, ProductApi, ProductionApi, RawMaterialApi};

// 应用
pub use app::{build_router, AppState};
pub use config::AppConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "inventory-production";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
