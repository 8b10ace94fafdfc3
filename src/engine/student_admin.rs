// ==========================================
// 学生实习分配系统 - 学生名册管理
// ==========================================
// 职责: 新增 / 编辑 / 删除学生
// 红线: 编辑不触碰分配关系; 删除前先从所属工厂释放
// ==========================================

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::student::{Student, StudentId};
use crate::engine::error::{DistributionError, DistributionResult, FieldViolation};
use crate::repository::roster_repo::RosterStore;

/// 新增学生表单
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    pub department: String,
    pub group: String,
    pub stage: String,
    #[serde(default)]
    pub enrolled_on: Option<NaiveDate>, // 缺省为今天
}

/// 编辑学生 (仅修改给出的字段)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub department: Option<String>,
    pub group: Option<String>,
    pub stage: Option<String>,
    pub enrolled_on: Option<NaiveDate>,
}

fn require_text(violations: &mut Vec<FieldViolation>, field: &str, value: &str) {
    if value.trim().is_empty() {
        violations.push(FieldViolation::new(field, "不能为空"));
    }
}

// ==========================================
// StudentAdmin - 学生名册管理
// ==========================================
#[derive(Debug, Default)]
pub struct StudentAdmin {
    // 无状态
}

impl StudentAdmin {
    pub fn new() -> Self {
        Self {}
    }

    /// 新增学生 (ID = 现有最大ID + 1, 未分配)
    pub fn add_student(
        &self,
        store: &mut RosterStore,
        draft: &StudentDraft,
    ) -> DistributionResult<Student> {
        let mut violations = Vec::new();
        require_text(&mut violations, "name", &draft.name);
        require_text(&mut violations, "department", &draft.department);
        require_text(&mut violations, "group", &draft.group);
        require_text(&mut violations, "stage", &draft.stage);
        if !violations.is_empty() {
            return Err(DistributionError::ValidationFailed(violations));
        }

        let student = Student::new(
            store.next_student_id(),
            draft.name.trim(),
            draft.department.trim(),
            draft.group.trim(),
            draft.stage.trim(),
            draft
                .enrolled_on
                .unwrap_or_else(|| Local::now().date_naive()),
        );
        store.insert_student(student.clone())?;

        info!(student_id = student.id, name = %student.name, "学生新增完成");
        Ok(student)
    }

    /// 编辑学生基本信息
    pub fn update_student(
        &self,
        store: &mut RosterStore,
        student_id: StudentId,
        patch: &StudentPatch,
    ) -> DistributionResult<Student> {
        let mut violations = Vec::new();
        for (field, value) in [
            ("name", &patch.name),
            ("department", &patch.department),
            ("group", &patch.group),
            ("stage", &patch.stage),
        ] {
            if let Some(value) = value {
                require_text(&mut violations, field, value);
            }
        }
        if !violations.is_empty() {
            return Err(DistributionError::ValidationFailed(violations));
        }

        let student = store
            .student_mut(student_id)
            .ok_or(DistributionError::StudentNotFound(student_id))?;
        if let Some(name) = &patch.name {
            student.name = name.trim().to_string();
        }
        if let Some(department) = &patch.department {
            student.department = department.trim().to_string();
        }
        if let Some(group) = &patch.group {
            student.group = group.trim().to_string();
        }
        if let Some(stage) = &patch.stage {
            student.stage = stage.trim().to_string();
        }
        if let Some(enrolled_on) = patch.enrolled_on {
            student.enrolled_on = enrolled_on;
        }

        Ok(student.clone())
    }

    /// 删除学生
    pub fn remove_student(
        &self,
        store: &mut RosterStore,
        student_id: StudentId,
    ) -> DistributionResult<Student> {
        store.find_student(student_id)
            .ok_or(DistributionError::StudentNotFound(student_id))?;
        let removed = store.remove_student(student_id)?;
        info!(student_id, "学生已删除");
        Ok(removed)
    }

    /// 删除全部选中学生
    ///
    /// # 返回
    /// 被删除的学生ID (名册顺序)
    pub fn remove_selected(&self, store: &mut RosterStore) -> DistributionResult<Vec<StudentId>> {
        let ids: Vec<StudentId> = store.selected_students().iter().map(|s| s.id).collect();
        for id in &ids {
            store.remove_student(*id)?;
        }
        if !ids.is_empty() {
            info!(removed = ids.len(), "选中学生已删除");
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_student_reports_all_missing_fields() {
        let mut store = RosterStore::new();
        let draft = StudentDraft {
            name: " ".to_string(),
            department: "Science".to_string(),
            ..Default::default()
        };

        let err = StudentAdmin::new().add_student(&mut store, &draft).unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "group", "stage"]);
        assert!(store.students().is_empty());
    }

    #[test]
    fn test_update_student_keeps_id() {
        let mut store = RosterStore::new();
        let admin = StudentAdmin::new();
        let draft = StudentDraft {
            name: "Mona Khaled".to_string(),
            department: "Engineering".to_string(),
            group: "Group B".to_string(),
            stage: "Stage 2".to_string(),
            enrolled_on: NaiveDate::from_ymd_opt(2023, 10, 1),
        };
        let added = admin.add_student(&mut store, &draft).unwrap();
        assert_eq!(added.id, 1);

        let patch = StudentPatch {
            stage: Some("Stage 3".to_string()),
            ..Default::default()
        };
        let updated = admin.update_student(&mut store, 1, &patch).unwrap();
        assert_eq!(updated.stage, "Stage 3");
        assert_eq!(updated.name, "Mona Khaled");

        let bad = StudentPatch {
            name: Some("".to_string()),
            ..Default::default()
        };
        assert!(admin.update_student(&mut store, 1, &bad).is_err());
        assert!(matches!(
            admin.update_student(&mut store, 7, &patch),
            Err(DistributionError::StudentNotFound(7))
        ));
    }
}
