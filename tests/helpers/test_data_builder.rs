// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use student_distribution::domain::types::FactoryType;
use student_distribution::{Factory, FactoryId, RosterStore, Student, StudentId};

// ==========================================
// Student 构建器
// ==========================================

pub struct StudentBuilder {
    id: StudentId,
    name: String,
    department: String,
    group: String,
    stage: String,
    enrolled_on: NaiveDate,
    assigned_factory: Option<FactoryId>,
}

impl StudentBuilder {
    pub fn new(id: StudentId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            department: "Engineering".to_string(),
            group: "Group A".to_string(),
            stage: "Stage 1".to_string(),
            enrolled_on: NaiveDate::from_ymd_opt(2021, 3, 26).unwrap(),
            assigned_factory: None,
        }
    }

    pub fn department(mut self, department: &str) -> Self {
        self.department = department.to_string();
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    pub fn stage(mut self, stage: &str) -> Self {
        self.stage = stage.to_string();
        self
    }

    pub fn enrolled_on(mut self, date: NaiveDate) -> Self {
        self.enrolled_on = date;
        self
    }

    pub fn assigned_to(mut self, factory_id: FactoryId) -> Self {
        self.assigned_factory = Some(factory_id);
        self
    }

    pub fn build(self) -> Student {
        let student = Student::new(
            self.id,
            &self.name,
            &self.department,
            &self.group,
            &self.stage,
            self.enrolled_on,
        );
        match self.assigned_factory {
            Some(factory_id) => student.with_assignment(factory_id),
            None => student,
        }
    }
}

// ==========================================
// Factory 构建器
// ==========================================

pub struct FactoryBuilder {
    id: FactoryId,
    name: String,
    capacity: u32,
    factory_type: FactoryType,
}

impl FactoryBuilder {
    pub fn new(id: FactoryId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            capacity: 3,
            factory_type: FactoryType::Internal,
        }
    }

    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn external(mut self) -> Self {
        self.factory_type = FactoryType::External;
        self
    }

    pub fn build(self) -> Factory {
        Factory::new(self.id, &self.name, self.capacity).with_type(self.factory_type)
    }
}

// ==========================================
// 名册快捷构建
// ==========================================

/// 由学生与工厂构建名册 (成员关系按学生引用重建)
pub fn roster(students: Vec<Student>, factories: Vec<Factory>) -> RosterStore {
    RosterStore::from_seed(students, factories).expect("测试名册构建失败")
}

/// n 名未分配学生 (ID 1..=n)
pub fn unassigned_students(n: u32) -> Vec<Student> {
    (1..=n)
        .map(|id| StudentBuilder::new(id, &format!("Student {}", id)).build())
        .collect()
}
