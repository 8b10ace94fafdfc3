// ==========================================
// 学生实习分配系统 - 名册仓储 (Roster Store)
// ==========================================
// 职责: 持有学生与工厂的唯一权威列表
// 红线: 外部只读; 成员关系只能经由引擎层 pub(crate) 接口改写
// 存储: 内存 Vec (无持久化)
// ==========================================

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::domain::factory::{CapacityConstraint, Factory, FactoryId};
use crate::domain::student::{Student, StudentId};
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// RosterStore - 名册
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RosterStore {
    students: Vec<Student>,
    factories: Vec<Factory>,
}

impl RosterStore {
    /// 创建空名册
    pub fn new() -> Self {
        Self::default()
    }

    /// 从种子数据装载名册
    ///
    /// 规则:
    /// 1) 学生ID、工厂ID 必须唯一,否则拒绝装载
    /// 2) 工厂成员由学生的 assigned_factory 引用重建
    /// 3) 引用了不存在的工厂、或工厂已满的学生,装载为未分配并告警
    /// 4) 选择状态一律清空
    pub fn from_seed(students: Vec<Student>, factories: Vec<Factory>) -> RepositoryResult<Self> {
        ensure_unique_ids(students.iter().map(|s| s.id), "Student")?;
        ensure_unique_ids(factories.iter().map(|f| f.id), "Factory")?;

        let mut store = Self {
            students,
            factories,
        };

        for factory in store.factories.iter_mut() {
            factory.clear_members();
        }

        for student in store.students.iter_mut() {
            student.set_selected(false);

            let Some(factory_id) = student.assigned_factory() else {
                continue;
            };

            match store.factories.iter_mut().find(|f| f.id == factory_id) {
                Some(factory) if factory.can_admit(1) => {
                    factory.admit(student.id);
                }
                Some(factory) => {
                    warn!(
                        student_id = student.id,
                        factory_id,
                        capacity = factory.capacity,
                        "种子数据超出工厂容量,学生按未分配装载"
                    );
                    student.set_assigned_factory(None);
                }
                None => {
                    warn!(
                        student_id = student.id,
                        factory_id, "种子数据引用了不存在的工厂,学生按未分配装载"
                    );
                    student.set_assigned_factory(None);
                }
            }
        }

        debug!(
            students = store.students.len(),
            factories = store.factories.len(),
            "名册装载完成"
        );
        Ok(store)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn factories(&self) -> &[Factory] {
        &self.factories
    }

    pub fn find_student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn find_factory(&self, id: FactoryId) -> Option<&Factory> {
        self.factories.iter().find(|f| f.id == id)
    }

    /// 查询学生,不存在时返回 NotFound
    pub fn student(&self, id: StudentId) -> RepositoryResult<&Student> {
        self.find_student(id)
            .ok_or_else(|| RepositoryError::student_not_found(id))
    }

    /// 查询工厂,不存在时返回 NotFound
    pub fn factory(&self, id: FactoryId) -> RepositoryResult<&Factory> {
        self.find_factory(id)
            .ok_or_else(|| RepositoryError::factory_not_found(id))
    }

    /// 学生所属工厂名称 (未分配时为 None)
    pub fn factory_name_of(&self, student: &Student) -> Option<&str> {
        student
            .assigned_factory()
            .and_then(|id| self.find_factory(id))
            .map(|f| f.name.as_str())
    }

    /// 当前被选中的学生 (名册顺序)
    pub fn selected_students(&self) -> Vec<&Student> {
        self.students.iter().filter(|s| s.is_selected()).collect()
    }

    /// 下一个学生ID (max + 1, 空名册为 1)
    pub fn next_student_id(&self) -> StudentId {
        self.students.iter().map(|s| s.id).max().unwrap_or(0) + 1
    }

    /// 下一个工厂ID (max + 1, 空登记表为 1)
    pub fn next_factory_id(&self) -> FactoryId {
        self.factories.iter().map(|f| f.id).max().unwrap_or(0) + 1
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 追加学生 (总是以未分配、未选中状态加入)
    pub fn insert_student(&mut self, mut student: Student) -> RepositoryResult<()> {
        if self.find_student(student.id).is_some() {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "Student id={} 已存在",
                student.id
            )));
        }
        student.set_assigned_factory(None);
        student.set_selected(false);
        self.students.push(student);
        Ok(())
    }

    /// 追加工厂 (成员清空)
    pub fn insert_factory(&mut self, mut factory: Factory) -> RepositoryResult<()> {
        if self.find_factory(factory.id).is_some() {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "Factory id={} 已存在",
                factory.id
            )));
        }
        factory.clear_members();
        self.factories.push(factory);
        Ok(())
    }

    /// 删除学生; 先从所属工厂释放,再移出名册
    pub fn remove_student(&mut self, id: StudentId) -> RepositoryResult<Student> {
        let index = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| RepositoryError::student_not_found(id))?;

        if let Some(factory_id) = self.students[index].assigned_factory() {
            if let Some(factory) = self.factory_mut(factory_id) {
                factory.release(id);
            }
        }

        let mut removed = self.students.remove(index);
        removed.set_assigned_factory(None);
        Ok(removed)
    }

    // ==========================================
    // 引擎层内部接口
    // ==========================================

    pub(crate) fn student_mut(&mut self, id: StudentId) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == id)
    }

    pub(crate) fn factory_mut(&mut self, id: FactoryId) -> Option<&mut Factory> {
        self.factories.iter_mut().find(|f| f.id == id)
    }

    pub(crate) fn students_mut(&mut self) -> impl Iterator<Item = &mut Student> {
        self.students.iter_mut()
    }

    // ==========================================
    // 不变量校验
    // ==========================================

    /// 校验名册全部不变量
    ///
    /// - 每个工厂: 成员不重复, 成员数 <= 容量
    /// - 每个工厂成员: 学生存在且引用指回该工厂
    /// - 每个已分配学生: 恰好出现在其引用工厂的成员中
    pub fn check_invariants(&self) -> RepositoryResult<()> {
        let mut owners: HashSet<StudentId> = HashSet::new();

        for factory in &self.factories {
            if factory.assigned_count() > factory.capacity {
                return Err(RepositoryError::InvariantViolation(format!(
                    "工厂 {} 超出容量: {} > {}",
                    factory.id,
                    factory.assigned_count(),
                    factory.capacity
                )));
            }

            for student_id in factory.students() {
                if !owners.insert(*student_id) {
                    return Err(RepositoryError::InvariantViolation(format!(
                        "学生 {} 同时属于多个工厂或在工厂 {} 中重复",
                        student_id, factory.id
                    )));
                }
                let student = self.find_student(*student_id).ok_or_else(|| {
                    RepositoryError::InvariantViolation(format!(
                        "工厂 {} 的成员 {} 不在名册中",
                        factory.id, student_id
                    ))
                })?;
                if student.assigned_factory() != Some(factory.id) {
                    return Err(RepositoryError::InvariantViolation(format!(
                        "学生 {} 的引用与工厂 {} 成员关系不一致",
                        student_id, factory.id
                    )));
                }
            }
        }

        for student in &self.students {
            if student.is_assigned() && !owners.contains(&student.id) {
                return Err(RepositoryError::InvariantViolation(format!(
                    "学生 {} 引用了工厂但不在其成员中",
                    student.id
                )));
            }
        }

        Ok(())
    }
}

fn ensure_unique_ids(ids: impl Iterator<Item = u32>, entity: &str) -> RepositoryResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "{} id={} 重复",
                entity, id
            )));
        }
    }
    Ok(())
}
