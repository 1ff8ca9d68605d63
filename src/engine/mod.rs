// ==========================================
// 库存生产系统 - 引擎层
// ==========================================
// 职责: 可生产量计算、生产扣料、生产检查/优先级排序
// 红线: Engine 不拼 SQL，只依赖 InventoryStore 契约
// ==========================================

pub mod error;
pub mod feasibility;
pub mod priority;
pub mod production;

// 重导出核心引擎
pub use error::{ProductionError, ProductionResult};
pub use feasibility::FeasibilityCalculator;
pub use priority::PriorityRanker;
pub use production::{ProductionExecutor, StockDecrement};
