// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use inventory_production::domain::{
    MaterialUsagePatch, NewMaterialUsage, NewProduct, NewRawMaterial, ProductPatch,
    RawMaterialPatch,
};

// ==========================================
// Product 构建器
// ==========================================

pub struct ProductBuilder {
    code: Option<String>,
    name: Option<String>,
    unit_price: Option<f64>,
}

impl ProductBuilder {
    pub fn new(code: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            name: Some(format!("Product {}", code)),
            unit_price: Some(10.0),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.unit_price = Some(price);
        self
    }

    pub fn without_code(mut self) -> Self {
        self.code = None;
        self
    }

    pub fn without_price(mut self) -> Self {
        self.unit_price = None;
        self
    }

    pub fn build(self) -> NewProduct {
        NewProduct {
            code: self.code,
            name: self.name,
            unit_price: self.unit_price,
        }
    }
}

// ==========================================
// RawMaterial 构建器
// ==========================================

pub struct RawMaterialBuilder {
    code: Option<String>,
    description: Option<String>,
    available_stock: Option<i64>,
}

impl RawMaterialBuilder {
    pub fn new(code: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            description: Some(format!("Material {}", code)),
            available_stock: Some(100),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn stock(mut self, stock: i64) -> Self {
        self.available_stock = Some(stock);
        self
    }

    pub fn build(self) -> NewRawMaterial {
        NewRawMaterial {
            code: self.code,
            description: self.description,
            available_stock: self.available_stock,
        }
    }
}

// ==========================================
// MaterialUsage 构建器
// ==========================================

pub fn usage(product_id: i64, raw_material_id: i64, consumption_per_unit: i64) -> NewMaterialUsage {
    NewMaterialUsage {
        product_id: Some(product_id),
        raw_material_id: Some(raw_material_id),
        consumption_per_unit: Some(consumption_per_unit),
    }
}

// ==========================================
// 部分更新请求
// ==========================================

pub fn product_price_patch(price: f64) -> ProductPatch {
    ProductPatch {
        unit_price: Some(price),
        ..Default::default()
    }
}

pub fn stock_patch(stock: i64) -> RawMaterialPatch {
    RawMaterialPatch {
        available_stock: Some(stock),
        ..Default::default()
    }
}

pub fn consumption_patch(consumption_per_unit: i64) -> MaterialUsagePatch {
    MaterialUsagePatch {
        consumption_per_unit: Some(consumption_per_unit),
    }
}
