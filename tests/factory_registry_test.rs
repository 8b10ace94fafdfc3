// ==========================================
// 工厂登记集成测试
// ==========================================
// 测试范围:
// 1. 各字段独立校验, 全部违规一次报告
// 2. 校验失败时名册不变
// 3. ID 分配与默认值
// ==========================================

mod helpers;

use helpers::test_data_builder::*;
use student_distribution::config::DistributionConfig;
use student_distribution::engine::FactoryDraft;
use student_distribution::{DistributionError, FactoryRegistry, FactoryType, RosterStore};

fn registry() -> FactoryRegistry {
    FactoryRegistry::new(&DistributionConfig::default()).unwrap()
}

fn fields(err: &DistributionError) -> Vec<&str> {
    err.violations().iter().map(|v| v.field.as_str()).collect()
}

#[test]
fn test_short_fields_rejected_together() {
    let mut store = roster(vec![], vec![FactoryBuilder::new(1, "Factory A").build()]);

    let err = registry()
        .create_factory(&mut store, &FactoryDraft::new("AB", "123 St", "123", ""))
        .unwrap_err();

    assert_eq!(fields(&err), vec!["name", "phone", "department"]);
    assert_eq!(store.factories().len(), 1);
}

#[test]
fn test_all_four_fields_reported() {
    let mut store = RosterStore::new();
    let err = registry()
        .create_factory(&mut store, &FactoryDraft::new(" ", "St", "abc", "  "))
        .unwrap_err();
    assert_eq!(fields(&err), vec!["name", "address", "phone", "department"]);
    assert!(store.factories().is_empty());
}

#[test]
fn test_duplicate_name_rejected_case_insensitive() {
    let mut store = roster(vec![], vec![FactoryBuilder::new(1, "Factory A").build()]);
    let err = registry()
        .create_factory(
            &mut store,
            &FactoryDraft::new("  factory a ", "12 Port Said St", "01012345678", "Engineering"),
        )
        .unwrap_err();
    assert_eq!(fields(&err), vec!["name"]);
}

#[test]
fn test_duplicate_name_rejected_beyond_ascii() {
    let mut store = roster(vec![], vec![FactoryBuilder::new(1, "Émail Works").build()]);
    let err = registry()
        .create_factory(
            &mut store,
            &FactoryDraft::new("émail works", "12 Port Said St", "01012345678", "Engineering"),
        )
        .unwrap_err();
    assert_eq!(fields(&err), vec!["name"]);
    assert_eq!(store.factories().len(), 1);
}

#[test]
fn test_create_assigns_next_id_and_defaults() {
    let mut store = roster(
        vec![],
        vec![
            FactoryBuilder::new(1, "Factory A").build(),
            FactoryBuilder::new(7, "Factory G").build(),
        ],
    );

    let factory = registry()
        .create_factory(
            &mut store,
            &FactoryDraft::new(" Nile Textiles ", " 12 Port Said St ", "01012345678", "Engineering"),
        )
        .unwrap();

    assert_eq!(factory.id, 8);
    assert_eq!(factory.name, "Nile Textiles");
    assert_eq!(factory.address.as_deref(), Some("12 Port Said St"));
    assert_eq!(factory.capacity, DistributionConfig::default().default_factory_capacity);
    assert_eq!(factory.factory_type, FactoryType::Internal);
    assert!(factory.students().is_empty());
    assert_eq!(store.factories().last().unwrap().id, 8);
}

#[test]
fn test_first_factory_gets_id_one_with_explicit_values() {
    let mut store = RosterStore::new();
    let factory = registry()
        .create_factory(
            &mut store,
            &FactoryDraft::new("Delta Works", "5 Canal Rd", "002012345678901", "Science")
                .with_capacity(4)
                .with_type(FactoryType::External),
        )
        .unwrap();
    assert_eq!(factory.id, 1);
    assert_eq!(factory.capacity, 4);
    assert_eq!(factory.factory_type, FactoryType::External);
}

#[test]
fn test_configured_thresholds_apply() {
    let mut config = DistributionConfig::default();
    config.validation.factory_name_min_chars = 6;
    config.validation.phone_min_digits = 5;
    config.validation.phone_max_digits = 6;
    let registry = FactoryRegistry::new(&config).unwrap();
    let store = RosterStore::new();

    let violations = registry.validate(&store, &FactoryDraft::new("Delta", "5 Canal Rd", "12345", "Science"));
    let names: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
    assert_eq!(names, vec!["name"]);
}
