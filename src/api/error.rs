// ==========================================
// 学生实习分配系统 - API层错误类型
// ==========================================
// 职责: 将引擎/仓储/导入导出错误转换为面向用户的错误
// 红线: 所有错误信息必须包含显式原因
// ==========================================

use thiserror::Error;

use crate::domain::factory::FactoryId;
use crate::engine::error::{DistributionError, FieldViolation};
use crate::export::error::ExportError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 访问控制
    // ==========================================
    #[error("未登录: 请先完成身份验证")]
    Unauthenticated,

    // ==========================================
    // 业务规则错误
    // ==========================================
    /// 容量约束违反
    #[error(
        "容量不足: {factory_name} 剩余 {available} 个名额,请求 {requested} 人,缺口 {shortfall}"
    )]
    CapacityExceeded {
        factory_id: FactoryId,
        factory_name: String,
        requested: u32,
        available: u32,
        shortfall: u32,
    },

    #[error("数据验证失败: {}", describe(.0))]
    ValidationFailed(Vec<FieldViolation>),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 导入导出错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("文件导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 校验失败时的违规字段列表
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ApiError::ValidationFailed(violations) => violations,
            _ => &[],
        }
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::InvariantViolation(msg) => ApiError::InternalError(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 DistributionError 转换
// ==========================================
impl From<DistributionError> for ApiError {
    fn from(err: DistributionError) -> Self {
        match err {
            DistributionError::CapacityExceeded {
                factory_id,
                factory_name,
                requested,
                available,
                shortfall,
            } => ApiError::CapacityExceeded {
                factory_id,
                factory_name,
                requested,
                available,
                shortfall,
            },
            DistributionError::ValidationFailed(violations) => {
                ApiError::ValidationFailed(violations)
            }
            DistributionError::StudentNotFound(id) => {
                ApiError::NotFound(format!("Student(id={})不存在", id))
            }
            DistributionError::FactoryNotFound(id) => {
                ApiError::NotFound(format!("Factory(id={})不存在", id))
            }
            DistributionError::NotAssigned(id) => {
                ApiError::BusinessRuleViolation(format!("学生(id={})未分配到任何工厂", id))
            }
            DistributionError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            DistributionError::Repository(err) => ApiError::from(err),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Roster(err) => ApiError::from(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
