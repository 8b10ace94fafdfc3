// ==========================================
// 学生实习分配系统 - 名册数据源
// ==========================================
// 职责: 提供初始学生与工厂 (种子数据)
// 实现: 内置种子 / JSON 文件
// 说明: 无回写; 名册只存在于内存
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::factory::Factory;
use crate::domain::student::Student;
use crate::domain::types::FactoryType;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::roster_repo::RosterStore;

/// 种子名册
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterSeed {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub factories: Vec<Factory>,
}

impl RosterSeed {
    /// 装载为名册 (重建成员关系并校验ID唯一)
    pub fn into_store(self) -> ImportResult<RosterStore> {
        Ok(RosterStore::from_seed(self.students, self.factories)?)
    }
}

// ==========================================
// Trait: RosterSource
// ==========================================
pub trait RosterSource {
    /// 读取种子名册
    fn load(&self) -> ImportResult<RosterSeed>;

    /// 数据源描述 (日志用)
    fn describe(&self) -> String;
}

// ==========================================
// SeedRosterSource - 内置种子数据
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedRosterSource;

impl RosterSource for SeedRosterSource {
    fn load(&self) -> ImportResult<RosterSeed> {
        let enrolled = NaiveDate::from_ymd_opt(2021, 3, 26)
            .ok_or_else(|| anyhow::anyhow!("内置种子日期非法"))?;

        let students = vec![
            Student::new(1, "Ahmed Mohamed", "Engineering", "Group A", "Stage 1", enrolled),
            Student::new(2, "Sara Ahmed", "Science", "Group B", "Stage 2", enrolled),
            Student::new(3, "Omar Ali", "Engineering", "Group A", "Stage 1", enrolled),
            Student::new(4, "Nour Hassan", "Science", "Group C", "Stage 3", enrolled),
            Student::new(5, "Mona Khaled", "Engineering", "Group B", "Stage 2", enrolled),
        ];

        let factories = vec![
            Factory::new(1, "Factory A", 3),
            Factory::new(2, "Factory B", 2),
            Factory::new(3, "Factory C", 2).with_type(FactoryType::External),
        ];

        Ok(RosterSeed {
            students,
            factories,
        })
    }

    fn describe(&self) -> String {
        "builtin-seed".to_string()
    }
}

// ==========================================
// JsonRosterSource - JSON 文件
// ==========================================
#[derive(Debug, Clone)]
pub struct JsonRosterSource {
    path: PathBuf,
}

impl JsonRosterSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RosterSource for JsonRosterSource {
    fn load(&self) -> ImportResult<RosterSeed> {
        let path = self.path.as_path();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if ext != "json" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                    ".json",
                ));
            }
        }

        let raw = fs::read_to_string(path)?;
        let seed: RosterSeed = serde_json::from_str(&raw)?;

        info!(
            path = %path.display(),
            students = seed.students.len(),
            factories = seed.factories.len(),
            "名册文件读取完成"
        );
        Ok(seed)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_seed_loads_clean() {
        let store = SeedRosterSource.load().unwrap().into_store().unwrap();
        assert_eq!(store.students().len(), 5);
        assert_eq!(store.factories().len(), 3);
        assert!(store.students().iter().all(|s| !s.is_assigned()));
        assert!(store.check_invariants().is_ok());
    }

    #[test]
    fn test_json_source_rebuilds_membership() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(
            &path,
            r#"{
                "students": [
                    { "id": 1, "name": "Omar Ali", "department": "Engineering", "group": "Group A",
                      "stage": "Stage 1", "enrolled_on": "2022-09-01", "assigned_factory": 7 },
                    { "id": 2, "name": "Sara Ahmed", "department": "Science", "group": "Group B",
                      "stage": "Stage 2", "enrolled_on": "2022-09-01" }
                ],
                "factories": [
                    { "id": 7, "name": "Delta Works", "capacity": 2, "factory_type": "External",
                      "students": [2, 2, 2] }
                ]
            }"#,
        )
        .unwrap();

        let store = JsonRosterSource::new(&path).load().unwrap().into_store().unwrap();
        let factory = store.find_factory(7).unwrap();
        assert_eq!(factory.students(), &[1]);
        assert_eq!(factory.factory_type, FactoryType::External);
    }

    #[test]
    fn test_json_source_missing_file() {
        let result = JsonRosterSource::new("/nonexistent/roster.json").load();
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
