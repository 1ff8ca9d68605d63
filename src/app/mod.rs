// ==========================================
// 库存生产系统 - 应用层
// ==========================================
// 职责: 应用状态装配 + HTTP 接口
// ==========================================

pub mod http;
pub mod state;

// 重导出
pub use http::build_router;
pub use state::AppState;
