// ==========================================
// 学生实习分配系统 - 应用层
// ==========================================
// 职责: 装配名册与 API,供宿主跨线程共享
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
