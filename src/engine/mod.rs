// ==========================================
// 学生实习分配系统 - 引擎层
// ==========================================
// 职责: 实现分配业务规则,不持有名册
// 红线: 所有拒绝必须输出原因; 拒绝时不修改名册
// ==========================================

pub mod assignment;
pub mod error;
pub mod filter;
pub mod registry;
pub mod selection;
pub mod statistics;
pub mod student_admin;

// 重导出核心引擎
pub use assignment::{AssignmentEngine, BatchAssignResult, TransferOutcome};
pub use error::{DistributionError, DistributionResult, FieldViolation};
pub use filter::{choice, FilterCriteria, FilterEngine, RosterPage, RosterQuery, ALL_CHOICE};
pub use registry::{FactoryDraft, FactoryRegistry};
pub use selection::SelectionTracker;
pub use statistics::{FactoryUtilization, RosterStatistics, StatBucket, StatisticsEngine};
pub use student_admin::{StudentAdmin, StudentDraft, StudentPatch};
