// ==========================================
// 学生实习分配系统 - 核心库
// ==========================================
// 系统定位: 学生管理后台的分配引擎 (学生 -> 工厂)
// 运行模型: 单线程、事件驱动、内存名册
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 内存名册
pub mod repository;

// 引擎层 - 过滤 / 选择 / 分配 / 工厂登记
pub mod engine;

// 导入层 - 种子数据与名册导入
pub mod importer;

// 导出层 - CSV 导出
pub mod export;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ActionType, FactoryType, SelectModifier, SortOrder};

// 领域实体
pub use domain::{ActionLog, Factory, FactoryId, Student, StudentId};

// 引擎
pub use engine::{
    AssignmentEngine, DistributionError, FactoryRegistry, FilterCriteria, FilterEngine,
    SelectionTracker, StatisticsEngine,
};

// 仓储
pub use repository::RosterStore;

// API
pub use api::{ApiError, ApiResult, DistributionApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "学生实习分配系统";
