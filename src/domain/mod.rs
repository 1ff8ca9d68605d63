// ==========================================
// 库存生产系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、请求 DTO、生产结果记录
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod material_usage;
pub mod product;
pub mod production;
pub mod raw_material;

// 重导出核心类型
pub use material_usage::{BomLine, MaterialUsage, MaterialUsagePatch, MaterialUsageView, NewMaterialUsage};
pub use product::{NewProduct, Product, ProductPatch};
pub use production::{
    Feasibility, FeasibilityResult, ProductionCheckEntry, ProductionPriorityEntry,
    ProductionReceipt, StockShortage,
};
pub use raw_material::{NewRawMaterial, RawMaterial, RawMaterialPatch};
