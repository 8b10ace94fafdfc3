// ==========================================
// 学生实习分配系统 - 导出层
// ==========================================
// 职责: 将当前筛选视图导出为外部文件
// ==========================================

pub mod csv_export;
pub mod error;

pub use csv_export::{CsvRosterExporter, EXPORT_HEADER};
pub use error::{ExportError, ExportResult};
