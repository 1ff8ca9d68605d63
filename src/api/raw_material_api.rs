// ==========================================
// 库存生产系统 - 原材料 API
// ==========================================
// 职责: 原材料 CRUD，库存非负校验，编码/描述大小写不敏感查重
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::domain::raw_material::{NewRawMaterial, RawMaterial, RawMaterialPatch};
use crate::repository::raw_material_repo::RawMaterialRepository;

// ==========================================
// RawMaterialApi - 原材料 API
// ==========================================
pub struct RawMaterialApi {
    raw_material_repo: Arc<RawMaterialRepository>,
}

impl RawMaterialApi {
    pub fn new(raw_material_repo: Arc<RawMaterialRepository>) -> Self {
        Self { raw_material_repo }
    }

    pub fn list_raw_materials(&self) -> ApiResult<Vec<RawMaterial>> {
        let materials = self.raw_material_repo.list_all()?;
        debug!(count = materials.len(), "查询原材料列表");
        Ok(materials)
    }

    pub fn get_raw_material(&self, id: i64) -> ApiResult<RawMaterial> {
        self.raw_material_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("RawMaterial(id={})不存在", id)))
    }

    /// 创建原材料
    ///
    /// # 返回
    /// - Err(InvalidInput): code/description 缺失或为空，available_stock 缺失或为负
    /// - Err(Conflict): code 或 description 重复（大小写不敏感）
    pub fn create_raw_material(&self, request: NewRawMaterial) -> ApiResult<RawMaterial> {
        let code = validator::required_text(request.code.as_deref(), "code")?;
        let description = validator::required_text(request.description.as_deref(), "description")?;
        let stock = validator::available_stock(validator::required(
            request.available_stock,
            "available_stock",
        )?)?;

        if self.raw_material_repo.exists_by_code_ci(&code, None)? {
            return Err(duplicate("code", &code));
        }
        if self.raw_material_repo.exists_by_description_ci(&description, None)? {
            return Err(duplicate("description", &description));
        }

        let material = self.raw_material_repo.insert(&code, &description, stock)?;
        info!(
            raw_material_id = material.id,
            code = %material.code,
            available_stock = material.available_stock,
            "原材料已创建"
        );
        Ok(material)
    }

    pub fn update_raw_material(&self, id: i64, patch: RawMaterialPatch) -> ApiResult<RawMaterial> {
        let mut material = self.get_raw_material(id)?;

        if let Some(code) = validator::optional_text(patch.code.as_deref(), "code")? {
            if self.raw_material_repo.exists_by_code_ci(&code, Some(id))? {
                return Err(duplicate("code", &code));
            }
            material.code = code;
        }

        if let Some(description) =
            validator::optional_text(patch.description.as_deref(), "description")?
        {
            if self
                .raw_material_repo
                .exists_by_description_ci(&description, Some(id))?
            {
                return Err(duplicate("description", &description));
            }
            material.description = description;
        }

        if let Some(stock) = patch.available_stock {
            material.available_stock = validator::available_stock(stock)?;
        }

        let updated = self.raw_material_repo.update(&material)?;
        info!(
            raw_material_id = id,
            available_stock = updated.available_stock,
            "原材料已更新"
        );
        Ok(updated)
    }

    /// 删除原材料；仍被 BOM 引用时返回 Conflict
    pub fn delete_raw_material(&self, id: i64) -> ApiResult<()> {
        if !self.raw_material_repo.delete_by_id(id)? {
            return Err(ApiError::NotFound(format!("RawMaterial(id={})不存在", id)));
        }
        info!(raw_material_id = id, "原材料已删除");
        Ok(())
    }
}

fn duplicate(field: &str, value: &str) -> ApiError {
    ApiError::Conflict(format!("raw material with {} '{}' already exists", field, value))
}
