// ==========================================
// 学生实习分配系统 - API层
// ==========================================
// 职责: 对外业务接口,身份验证门控与错误转换
// ==========================================

pub mod auth;
pub mod distribution_api;
pub mod error;

pub use auth::{AuthGate, StaticAuth};
pub use distribution_api::{DistributionApi, DropOutcome};
pub use error::{ApiError, ApiResult};
