// ==========================================
// 学生实习分配系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务规则 (容量门控在引擎层)
// ==========================================
// 职责: 持有名册与操作日志,提供查询与受控写入
// ==========================================

pub mod action_log_repo;
pub mod error;
pub mod roster_repo;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use roster_repo::RosterStore;
