// ==========================================
// 库存生产系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 HTTP 处理器调用
// ==========================================

pub mod error;
pub mod material_usage_api;
pub mod product_api;
pub mod production_api;
pub mod raw_material_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use material_usage_api::MaterialUsageApi;
pub use product_api::ProductApi;
pub use production_api::ProductionApi;
pub use raw_material_api::RawMaterialApi;
