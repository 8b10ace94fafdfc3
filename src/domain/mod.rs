// ==========================================
// 学生实习分配系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、容量约束接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod factory;
pub mod student;
pub mod types;

// 重导出核心类型
pub use action_log::ActionLog;
pub use factory::{CapacityConstraint, Factory, FactoryId};
pub use student::{Student, StudentId};
pub use types::{ActionType, FactoryType, SelectModifier, SortOrder};
