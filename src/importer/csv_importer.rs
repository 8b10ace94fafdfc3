// ==========================================
// 学生实习分配系统 - 学生 CSV 导入
// ==========================================
// 职责: 读取学生名单 CSV,按表头映射为新增表单
// 表头: name, department, group|batch, stage, date (date 可选)
// 规则: TRIM / 跳过空白行 / 日期支持 YYYY-MM-DD 与 YYYYMMDD
// ==========================================

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::info;

use crate::engine::student_admin::StudentDraft;
use crate::importer::error::{ImportError, ImportResult};

// 必需列 (列名大小写不敏感)
const REQUIRED_COLUMNS: &[&str] = &["name", "department", "stage"];

// 班组列的可接受别名
const GROUP_ALIASES: &[&str] = &["group", "batch"];

// ==========================================
// CsvRosterImporter - 学生 CSV 导入器
// ==========================================
#[derive(Debug, Default)]
pub struct CsvRosterImporter;

impl CsvRosterImporter {
    pub fn new() -> Self {
        Self
    }

    /// 读取 CSV 文件
    ///
    /// # 返回
    /// 新增学生表单列表 (文件行顺序); 任一行非法则整体失败
    pub fn read_students(&self, file_path: &Path) -> ImportResult<Vec<StudentDraft>> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = file_path.extension() {
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                    ".csv",
                ));
            }
        }

        let file = File::open(file_path)?;
        let drafts = self.read_from(file)?;

        info!(path = %file_path.display(), rows = drafts.len(), "学生 CSV 读取完成");
        Ok(drafts)
    }

    /// 从任意输入读取 (首行为表头)
    pub fn read_from<R: std::io::Read>(&self, reader: R) -> ImportResult<Vec<StudentDraft>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        // 表头 -> 列下标
        let columns: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| (h.trim().to_lowercase(), idx))
            .collect();

        for column in REQUIRED_COLUMNS {
            if !columns.contains_key(*column) {
                return Err(ImportError::MissingColumn(column.to_string()));
            }
        }
        let group_column = GROUP_ALIASES
            .iter()
            .find_map(|alias| columns.get(*alias).copied())
            .ok_or_else(|| ImportError::MissingColumn("group".to_string()))?;

        let mut drafts = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            // 表头为第 1 行
            let row = row_idx + 2;

            let field = |idx: Option<usize>| -> String {
                idx.and_then(|i| record.get(i))
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default()
            };

            let name = field(columns.get("name").copied());
            let department = field(columns.get("department").copied());
            let group = field(Some(group_column));
            let stage = field(columns.get("stage").copied());
            let date = field(columns.get("date").copied());

            // 跳过完全空白的行
            if [&name, &department, &group, &stage, &date]
                .iter()
                .all(|v| v.is_empty())
            {
                continue;
            }

            for (column, value) in [
                ("name", &name),
                ("department", &department),
                ("group", &group),
                ("stage", &stage),
            ] {
                if value.is_empty() {
                    return Err(ImportError::MissingField {
                        row,
                        field: column.to_string(),
                    });
                }
            }

            let enrolled_on = if date.is_empty() {
                None
            } else {
                Some(parse_date(&date).ok_or_else(|| ImportError::DateFormatError {
                    row,
                    field: "date".to_string(),
                    value: date.clone(),
                })?)
            };

            drafts.push(StudentDraft {
                name,
                department,
                group,
                stage,
                enrolled_on,
            });
        }

        Ok(drafts)
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
        .ok()
}
