// ==========================================
// 库存生产系统 - 物料用量（BOM 行）API
// ==========================================
// 职责: BOM 行 CRUD；返回值内嵌已解析的产品与原材料
// 校验顺序: 产品存在 → 原材料存在 → 单位消耗量 > 0
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::domain::material_usage::{
    MaterialUsage, MaterialUsagePatch, MaterialUsageView, NewMaterialUsage,
};
use crate::domain::product::Product;
use crate::domain::raw_material::RawMaterial;
use crate::repository::material_usage_repo::MaterialUsageRepository;
use crate::repository::product_repo::ProductRepository;
use crate::repository::raw_material_repo::RawMaterialRepository;

// ==========================================
// MaterialUsageApi - 物料用量 API
// ==========================================
pub struct MaterialUsageApi {
    material_usage_repo: Arc<MaterialUsageRepository>,
    product_repo: Arc<ProductRepository>,
    raw_material_repo: Arc<RawMaterialRepository>,
}

impl MaterialUsageApi {
    pub fn new(
        material_usage_repo: Arc<MaterialUsageRepository>,
        product_repo: Arc<ProductRepository>,
        raw_material_repo: Arc<RawMaterialRepository>,
    ) -> Self {
        Self {
            material_usage_repo,
            product_repo,
            raw_material_repo,
        }
    }

    pub fn list_material_usages(&self) -> ApiResult<Vec<MaterialUsageView>> {
        let usages = self.material_usage_repo.list_all()?;
        debug!(count = usages.len(), "查询物料用量列表");
        usages.into_iter().map(|u| self.resolve(u)).collect()
    }

    pub fn get_material_usage(&self, id: i64) -> ApiResult<MaterialUsageView> {
        let usage = self.find_usage(id)?;
        self.resolve(usage)
    }

    /// 创建 BOM 行
    ///
    /// # 返回
    /// - Err(InvalidInput): 字段缺失或 consumption_per_unit <= 0
    /// - Err(NotFound): 产品或原材料不存在
    pub fn create_material_usage(&self, request: NewMaterialUsage) -> ApiResult<MaterialUsageView> {
        let product_id = validator::required(request.product_id, "product_id")?;
        let raw_material_id = validator::required(request.raw_material_id, "raw_material_id")?;

        let product = self.find_product(product_id)?;
        let raw_material = self.find_raw_material(raw_material_id)?;

        let consumption = validator::consumption_per_unit(validator::required(
            request.consumption_per_unit,
            "consumption_per_unit",
        )?)?;

        let usage = self
            .material_usage_repo
            .insert(product.id, raw_material.id, consumption)?;
        info!(
            usage_id = usage.id,
            product_id = product.id,
            raw_material_id = raw_material.id,
            consumption_per_unit = consumption,
            "物料用量已创建"
        );

        Ok(MaterialUsageView {
            id: usage.id,
            product,
            raw_material,
            consumption_per_unit: usage.consumption_per_unit,
        })
    }

    /// 更新 BOM 行（仅单位消耗量可改）
    pub fn update_material_usage(
        &self,
        id: i64,
        patch: MaterialUsagePatch,
    ) -> ApiResult<MaterialUsageView> {
        let usage = self.find_usage(id)?;

        let usage = match patch.consumption_per_unit {
            Some(value) => {
                let consumption = validator::consumption_per_unit(value)?;
                let updated = self.material_usage_repo.update_consumption(id, consumption)?;
                info!(usage_id = id, consumption_per_unit = consumption, "物料用量已更新");
                updated
            }
            None => usage,
        };

        self.resolve(usage)
    }

    pub fn delete_material_usage(&self, id: i64) -> ApiResult<()> {
        if !self.material_usage_repo.delete_by_id(id)? {
            return Err(ApiError::NotFound(format!("MaterialUsage(id={})不存在", id)));
        }
        info!(usage_id = id, "物料用量已删除");
        Ok(())
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn find_usage(&self, id: i64) -> ApiResult<MaterialUsage> {
        self.material_usage_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("MaterialUsage(id={})不存在", id)))
    }

    fn find_product(&self, id: i64) -> ApiResult<Product> {
        self.product_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Product(id={})不存在", id)))
    }

    fn find_raw_material(&self, id: i64) -> ApiResult<RawMaterial> {
        self.raw_material_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("RawMaterial(id={})不存在", id)))
    }

    fn resolve(&self, usage: MaterialUsage) -> ApiResult<MaterialUsageView> {
        Ok(MaterialUsageView {
            id: usage.id,
            product: self.find_product(usage.product_id)?,
            raw_material: self.find_raw_material(usage.raw_material_id)?,
            consumption_per_unit: usage.consumption_per_unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_test_connection;
    use std::sync::Mutex;

    struct Fixture {
        api: MaterialUsageApi,
        product_id: i64,
        raw_material_id: i64,
    }

    fn setup() -> Fixture {
        let conn = Arc::new(Mutex::new(open_test_connection()));
        let products = Arc::new(ProductRepository::new(conn.clone()));
        let materials = Arc::new(RawMaterialRepository::new(conn.clone()));
        let usages = Arc::new(MaterialUsageRepository::new(conn));

        let product_id = products.insert("P-1", "Chair", 10.0).unwrap().id;
        let raw_material_id = materials.insert("RM-1", "Wood", 10).unwrap().id;

        Fixture {
            api: MaterialUsageApi::new(usages, products, materials),
            product_id,
            raw_material_id,
        }
    }

    fn request(product_id: i64, raw_material_id: i64, consumption: i64) -> NewMaterialUsage {
        NewMaterialUsage {
            product_id: Some(product_id),
            raw_material_id: Some(raw_material_id),
            consumption_per_unit: Some(consumption),
        }
    }

    #[test]
    fn test_create_material_usage_embeds_entities() {
        let f = setup();
        let view = f
            .api
            .create_material_usage(request(f.product_id, f.raw_material_id, 2))
            .unwrap();
        assert_eq!(view.product.name, "Chair");
        assert_eq!(view.raw_material.description, "Wood");
        assert_eq!(view.consumption_per_unit, 2);

        assert_eq!(f.api.list_material_usages().unwrap().len(), 1);
    }

    #[test]
    fn test_create_material_usage_validation_order() {
        let f = setup();
        assert!(matches!(
            f.api.create_material_usage(request(999, 888, 0)),
            Err(ApiError::NotFound(msg)) if msg.contains("Product")
        ));
        assert!(matches!(
            f.api.create_material_usage(request(f.product_id, 888, 0)),
            Err(ApiError::NotFound(msg)) if msg.contains("RawMaterial")
        ));
        assert!(matches!(
            f.api.create_material_usage(request(f.product_id, f.raw_material_id, 0)),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_update_delete_material_usage() {
        let f = setup();
        let view = f
            .api
            .create_material_usage(request(f.product_id, f.raw_material_id, 2))
            .unwrap();

        let updated = f
            .api
            .update_material_usage(
                view.id,
                MaterialUsagePatch {
                    consumption_per_unit: Some(5),
                },
            )
            .unwrap();
        assert_eq!(updated.consumption_per_unit, 5);

        assert!(matches!(
            f.api.update_material_usage(
                view.id,
                MaterialUsagePatch {
                    consumption_per_unit: Some(-1)
                }
            ),
            Err(ApiError::InvalidInput(_))
        ));

        f.api.delete_material_usage(view.id).unwrap();
        assert!(matches!(
            f.api.get_material_usage(view.id),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            f.api.delete_material_usage(view.id),
            Err(ApiError::NotFound(_))
        ));
    }
}
