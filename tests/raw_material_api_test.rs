// ==========================================
// RawMaterialApi 集成测试
// ==========================================
// 测试范围:
// 1. 创建: 必填字段、库存非负、编码/描述查重
// 2. 更新: 库存调整
// 3. 删除: 被 BOM 引用时拒绝
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use helpers::test_data_builder::{stock_patch, RawMaterialBuilder};
use inventory_production::domain::RawMaterialPatch;

#[test]
fn test_create_raw_material_success() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let material = env
        .raw_material_api
        .create_raw_material(
            RawMaterialBuilder::new(" RM-01 ")
                .description(" Oak plank ")
                .stock(0)
                .build(),
        )
        .unwrap();

    assert_eq!(material.code, "RM-01");
    assert_eq!(material.description, "Oak plank");
    assert_eq!(material.available_stock, 0);
    assert_eq!(
        env.raw_material_api.get_raw_material(material.id).unwrap(),
        material
    );
}

#[test]
fn test_create_raw_material_validation_and_duplicates() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.raw_material_api
        .create_raw_material(RawMaterialBuilder::new("RM-01").description("Steel").build())
        .unwrap();

    assert_conflict(
        env.raw_material_api
            .create_raw_material(RawMaterialBuilder::new("rm-01").description("Other").build()),
    );
    assert_conflict(
        env.raw_material_api
            .create_raw_material(RawMaterialBuilder::new("RM-02").description("sTeEl").build()),
    );
    assert_invalid_input(
        env.raw_material_api
            .create_raw_material(RawMaterialBuilder::new("RM-03").stock(-1).build()),
    );
    assert_invalid_input(
        env.raw_material_api
            .create_raw_material(RawMaterialBuilder::new("").build()),
    );

    assert_eq!(env.raw_material_api.list_raw_materials().unwrap().len(), 1);
}

#[test]
fn test_update_raw_material_adjust_stock() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let material = env.create_raw_material("RM-01", 5);

    let updated = env
        .raw_material_api
        .update_raw_material(material.id, stock_patch(42))
        .unwrap();
    assert_eq!(updated.available_stock, 42);
    assert_eq!(env.stock_of(material.id), 42);

    assert_invalid_input(
        env.raw_material_api
            .update_raw_material(material.id, stock_patch(-1)),
    );
    assert_eq!(env.stock_of(material.id), 42);

    assert_not_found(
        env.raw_material_api
            .update_raw_material(999, RawMaterialPatch::default()),
    );
}

#[test]
fn test_update_raw_material_description_conflict() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let a = env.create_raw_material("A", 1);
    let b = env.create_raw_material("B", 1);

    assert_conflict(env.raw_material_api.update_raw_material(
        a.id,
        RawMaterialPatch {
            description: Some(b.description.to_uppercase()),
            ..Default::default()
        },
    ));

    // 修改为自身当前描述（仅大小写不同）允许
    let renamed = env
        .raw_material_api
        .update_raw_material(
            a.id,
            RawMaterialPatch {
                description: Some(a.description.to_lowercase()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.description, a.description.to_lowercase());
}

#[test]
fn test_delete_raw_material_referenced_conflict() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let product = env.create_product("P1", 10.0);
    let material = env.create_raw_material("RM1", 10);
    env.add_usage(product.id, material.id, 1);

    assert_conflict(env.raw_material_api.delete_raw_material(material.id));
    assert_eq!(env.stock_of(material.id), 10);

    let unused = env.create_raw_material("RM2", 3);
    env.raw_material_api.delete_raw_material(unused.id).unwrap();
    assert_not_found(env.raw_material_api.get_raw_material(unused.id));
}
