// ==========================================
// 学生实习分配系统 - 导入层
// ==========================================
// 职责: 外部数据导入 (种子名册 / 学生名单)
// 支持: 内置种子, JSON, CSV
// ==========================================

// 模块声明
pub mod csv_importer;
pub mod error;
pub mod roster_source;

// 重导出核心类型
pub use csv_importer::CsvRosterImporter;
pub use error::{ImportError, ImportResult};
pub use roster_source::{JsonRosterSource, RosterSeed, RosterSource, SeedRosterSource};
