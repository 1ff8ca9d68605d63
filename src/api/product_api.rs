// ==========================================
// 库存生产系统 - 产品 API
// ==========================================
// 职责: 产品 CRUD，字段校验与大小写不敏感查重
// 校验顺序: 存在性 → 字段 → 编码重复 → 名称重复
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::repository::product_repo::ProductRepository;

// ==========================================
// ProductApi - 产品 API
// ==========================================
pub struct ProductApi {
    product_repo: Arc<ProductRepository>,
}

impl ProductApi {
    pub fn new(product_repo: Arc<ProductRepository>) -> Self {
        Self { product_repo }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 全部产品（按 id 升序）
    pub fn list_products(&self) -> ApiResult<Vec<Product>> {
        let products = self.product_repo.list_all()?;
        debug!(count = products.len(), "查询产品列表");
        Ok(products)
    }

    pub fn get_product(&self, id: i64) -> ApiResult<Product> {
        self.product_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Product(id={})不存在", id)))
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 创建产品
    ///
    /// # 返回
    /// - Err(InvalidInput): code/name 缺失或为空，unit_price 缺失或非法
    /// - Err(Conflict): code 或 name 与已有产品重复（大小写不敏感）
    pub fn create_product(&self, request: NewProduct) -> ApiResult<Product> {
        let code = validator::required_text(request.code.as_deref(), "code")?;
        let name = validator::required_text(request.name.as_deref(), "name")?;
        let unit_price =
            validator::unit_price(validator::required(request.unit_price, "unit_price")?)?;

        self.ensure_unique(&code, &name, None)?;

        let product = self.product_repo.insert(&code, &name, unit_price)?;
        info!(product_id = product.id, code = %product.code, "产品已创建");
        Ok(product)
    }

    /// 部分更新产品；缺省字段保持不变
    pub fn update_product(&self, id: i64, patch: ProductPatch) -> ApiResult<Product> {
        let mut product = self.get_product(id)?;

        if let Some(code) = validator::optional_text(patch.code.as_deref(), "code")? {
            if self.product_repo.exists_by_code_ci(&code, Some(id))? {
                return Err(duplicate("code", &code));
            }
            product.code = code;
        }

        if let Some(name) = validator::optional_text(patch.name.as_deref(), "name")? {
            if self.product_repo.exists_by_name_ci(&name, Some(id))? {
                return Err(duplicate("name", &name));
            }
            product.name = name;
        }

        if let Some(price) = patch.unit_price {
            product.unit_price = validator::unit_price(price)?;
        }

        let updated = self.product_repo.update(&product)?;
        info!(product_id = id, "产品已更新");
        Ok(updated)
    }

    /// 删除产品；仍被 BOM 引用时返回 Conflict
    pub fn delete_product(&self, id: i64) -> ApiResult<()> {
        if !self.product_repo.delete_by_id(id)? {
            return Err(ApiError::NotFound(format!("Product(id={})不存在", id)));
        }
        info!(product_id = id, "产品已删除");
        Ok(())
    }

    fn ensure_unique(&self, code: &str, name: &str, exclude_id: Option<i64>) -> ApiResult<()> {
        if self.product_repo.exists_by_code_ci(code, exclude_id)? {
            return Err(duplicate("code", code));
        }
        if self.product_repo.exists_by_name_ci(name, exclude_id)? {
            return Err(duplicate("name", name));
        }
        Ok(())
    }
}

fn duplicate(field: &str, value: &str) -> ApiError {
    ApiError::Conflict(format!("product with {} '{}' already exists", field, value))
}
