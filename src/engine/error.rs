// ==========================================
// 学生实习分配系统 - 引擎层错误类型
// ==========================================
// 红线: 所有拒绝必须携带显式原因
// 红线: 返回错误时名册未发生任何修改
// 工具: thiserror 派生宏
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::factory::{CapacityConstraint, Factory, FactoryId};
use crate::domain::student::StudentId;
use crate::repository::error::RepositoryError;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum DistributionError {
    // ===== 容量约束 =====
    #[error(
        "容量不足: factory={factory_name}(id={factory_id}), requested={requested}, available={available}, shortfall={shortfall}"
    )]
    CapacityExceeded {
        factory_id: FactoryId,
        factory_name: String,
        requested: u32,
        available: u32,
        shortfall: u32,
    },

    // ===== 字段校验 =====
    #[error("字段校验失败: {}", summarize(.0))]
    ValidationFailed(Vec<FieldViolation>),

    // ===== 查找失败 =====
    #[error("学生不存在: id={0}")]
    StudentNotFound(StudentId),

    #[error("工厂不存在: id={0}")]
    FactoryNotFound(FactoryId),

    #[error("学生未分配到任何工厂: id={0}")]
    NotAssigned(StudentId),

    // ===== 参数错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DistributionError {
    /// 由目标工厂当前状态构造容量不足错误
    pub fn capacity_exceeded(factory: &Factory, requested: usize) -> Self {
        let requested = requested as u32;
        let available = factory.available_capacity();
        DistributionError::CapacityExceeded {
            factory_id: factory.id,
            factory_name: factory.name.clone(),
            requested,
            available,
            shortfall: requested.saturating_sub(available),
        }
    }

    /// 校验失败时的违规字段列表
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            DistributionError::ValidationFailed(violations) => violations,
            _ => &[],
        }
    }
}

// ==========================================
// 字段违规详情
// ==========================================

/// 单个字段的校验违规
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// 字段名 (name / address / phone / department ...)
    pub field: String,
    /// 违规原因
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result 类型别名
pub type DistributionResult<T> = Result<T, DistributionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_exceeded_reports_shortfall() {
        let mut factory = Factory::new(2, "Factory B", 2);
        factory.admit(1);

        let err = DistributionError::capacity_exceeded(&factory, 4);
        match &err {
            DistributionError::CapacityExceeded {
                requested,
                available,
                shortfall,
                ..
            } => {
                assert_eq!(*requested, 4);
                assert_eq!(*available, 1);
                assert_eq!(*shortfall, 3);
            }
            _ => panic!("Expected CapacityExceeded"),
        }
        assert!(err.to_string().contains("Factory B"));
    }

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = DistributionError::ValidationFailed(vec![
            FieldViolation::new("name", "至少 3 个字符"),
            FieldViolation::new("department", "不能为空"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("name"));
        assert!(msg.contains("department"));
        assert_eq!(err.violations().len(), 2);
    }
}
