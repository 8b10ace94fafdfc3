// ==========================================
// 学生实习分配系统 - 学生视图 CSV 导出
// ==========================================
// 列顺序固定: id,name,department,factory,batch,stage,date
// 规则: 含表头 / 所有字段加引号 / 未分配的工厂列为空串
// ==========================================

use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use tracing::info;

use crate::domain::student::Student;
use crate::export::error::{ExportError, ExportResult};
use crate::repository::roster_repo::RosterStore;

/// 导出表头
pub const EXPORT_HEADER: [&str; 7] = ["id", "name", "department", "factory", "batch", "stage", "date"];

// ==========================================
// CsvRosterExporter - 学生视图导出器
// ==========================================
#[derive(Debug, Clone)]
pub struct CsvRosterExporter {
    date_format: String,
}

impl CsvRosterExporter {
    /// 创建导出器
    ///
    /// # 参数
    /// - date_format: chrono strftime 格式 (如 %Y-%m-%d)
    pub fn new(date_format: &str) -> ExportResult<Self> {
        if date_format.trim().is_empty()
            || StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(ExportError::InvalidDateFormat(date_format.to_string()));
        }
        let exporter = Self {
            date_format: date_format.to_string(),
        };

        // 含时间字段 (%H 等) 的格式对日期无法渲染
        exporter.format_date(NaiveDate::default())?;
        Ok(exporter)
    }

    fn format_date(&self, date: NaiveDate) -> ExportResult<String> {
        let mut text = String::new();
        write!(text, "{}", date.format(&self.date_format))
            .map_err(|_| ExportError::InvalidDateFormat(self.date_format.clone()))?;
        Ok(text)
    }

    /// 导出到字符串
    pub fn to_csv_string(&self, store: &RosterStore, rows: &[&Student]) -> ExportResult<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer, store, rows)?;
        String::from_utf8(buffer).map_err(|e| ExportError::CsvWriteError(e.to_string()))
    }

    /// 导出到文件 (覆盖)
    pub fn write_file(
        &self,
        path: &Path,
        store: &RosterStore,
        rows: &[&Student],
    ) -> ExportResult<usize> {
        let file = File::create(path)?;
        let written = self.write_to(file, store, rows)?;
        info!(path = %path.display(), rows = written, "学生视图已导出");
        Ok(written)
    }

    /// 写入任意输出
    ///
    /// # 返回
    /// 写入的数据行数 (不含表头)
    pub fn write_to<W: std::io::Write>(
        &self,
        writer: W,
        store: &RosterStore,
        rows: &[&Student],
    ) -> ExportResult<usize> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(writer);

        writer.write_record(EXPORT_HEADER)?;
        for student in rows {
            let id = student.id.to_string();
            let factory = store.factory_name_of(student).unwrap_or("");
            let date = self.format_date(student.enrolled_on)?;
            writer.write_record([
                id.as_str(),
                student.name.as_str(),
                student.department.as_str(),
                factory,
                student.group.as_str(),
                student.stage.as_str(),
                date.as_str(),
            ])?;
        }
        writer.flush()?;

        Ok(rows.len())
    }
}
