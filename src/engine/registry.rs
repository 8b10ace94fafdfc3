// ==========================================
// 学生实习分配系统 - 工厂登记
// ==========================================
// 职责: 新建工厂表单校验 + 登记
// 红线: 各字段独立校验,一次报告全部违规
// 红线: 校验未通过时不登记任何工厂
// ==========================================

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::config_manager::{DistributionConfig, ValidationRules};
use crate::domain::factory::Factory;
use crate::domain::types::FactoryType;
use crate::engine::error::{DistributionError, DistributionResult, FieldViolation};
use crate::repository::roster_repo::RosterStore;

// ==========================================
// FactoryDraft - 新建工厂表单
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub department: String,
    #[serde(default)]
    pub factory_type: Option<FactoryType>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl FactoryDraft {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
            department: department.into(),
            factory_type: None,
            capacity: None,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_type(mut self, factory_type: FactoryType) -> Self {
        self.factory_type = Some(factory_type);
        self
    }
}

// ==========================================
// FactoryRegistry - 工厂登记
// ==========================================
#[derive(Debug, Clone)]
pub struct FactoryRegistry {
    rules: ValidationRules,
    phone_pattern: Regex,
    default_capacity: u32,
}

impl FactoryRegistry {
    /// 由系统配置构造
    pub fn new(config: &DistributionConfig) -> DistributionResult<Self> {
        let pattern = config.validation.phone_pattern();
        let phone_pattern = Regex::new(&pattern)
            .map_err(|e| DistributionError::InvalidInput(format!("电话规则非法: {}", e)))?;

        Ok(Self {
            rules: config.validation.clone(),
            phone_pattern,
            default_capacity: config.default_factory_capacity,
        })
    }

    /// 校验表单,返回全部违规 (空列表 = 通过)
    pub fn validate(&self, store: &RosterStore, draft: &FactoryDraft) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        let name = draft.name.trim();
        if name.chars().count() < self.rules.factory_name_min_chars {
            violations.push(FieldViolation::new(
                "name",
                format!("工厂名称至少 {} 个字符", self.rules.factory_name_min_chars),
            ));
        } else if store
            .factories()
            .iter()
            .any(|f| f.name.trim().to_lowercase() == name.to_lowercase())
        {
            violations.push(FieldViolation::new(
                "name",
                format!("工厂名称已存在: {}", name),
            ));
        }

        if draft.address.trim().chars().count() < self.rules.factory_address_min_chars {
            violations.push(FieldViolation::new(
                "address",
                format!("地址至少 {} 个字符", self.rules.factory_address_min_chars),
            ));
        }

        if !self.phone_pattern.is_match(&draft.phone) {
            violations.push(FieldViolation::new(
                "phone",
                format!(
                    "电话必须为 {}-{} 位数字",
                    self.rules.phone_min_digits, self.rules.phone_max_digits
                ),
            ));
        }

        if draft.department.trim().is_empty() {
            violations.push(FieldViolation::new("department", "院系不能为空"));
        }

        violations
    }

    /// 校验并登记新工厂
    ///
    /// # 返回
    /// - Ok(Factory): 新登记的工厂 (ID = 现有最大ID + 1, 成员为空)
    /// - Err(ValidationFailed): 全部违规字段
    pub fn create_factory(
        &self,
        store: &mut RosterStore,
        draft: &FactoryDraft,
    ) -> DistributionResult<Factory> {
        let violations = self.validate(store, draft);
        if !violations.is_empty() {
            warn!(violations = violations.len(), "工厂登记校验失败");
            return Err(DistributionError::ValidationFailed(violations));
        }

        let mut factory = Factory::new(
            store.next_factory_id(),
            draft.name.trim(),
            draft.capacity.unwrap_or(self.default_capacity),
        )
        .with_type(draft.factory_type.unwrap_or_default());
        factory.address = Some(draft.address.trim().to_string());
        factory.phone = Some(draft.phone.clone());
        factory.department = Some(draft.department.trim().to_string());

        store.insert_factory(factory.clone())?;

        info!(
            factory_id = factory.id,
            name = %factory.name,
            capacity = factory.capacity,
            "工厂登记完成"
        );
        Ok(factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FactoryRegistry {
        FactoryRegistry::new(&DistributionConfig::default()).unwrap()
    }

    #[test]
    fn test_valid_draft_passes() {
        let store = RosterStore::new();
        let draft = FactoryDraft::new("Nile Textiles", "12 Port Said St", "01012345678", "Engineering");
        assert!(registry().validate(&store, &draft).is_empty());
    }

    #[test]
    fn test_phone_rules() {
        let store = RosterStore::new();
        let registry = registry();
        for phone in ["123456789", "1234567890123456", "01012-45678", " 0101234567"] {
            let draft = FactoryDraft::new("Nile Textiles", "12 Port Said St", phone, "Engineering");
            let violations = registry.validate(&store, &draft);
            assert_eq!(violations.len(), 1, "phone={}", phone);
            assert_eq!(violations[0].field, "phone");
        }
    }

    #[test]
    fn test_trimmed_lengths() {
        let store = RosterStore::new();
        let draft = FactoryDraft::new("  AB  ", "  1234  ", "0101234567", "   ");
        let fields: Vec<_> = registry()
            .validate(&store, &draft)
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, vec!["name", "address", "department"]);
    }
}
