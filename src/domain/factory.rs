// ==========================================
// 学生实习分配系统 - 工厂领域模型
// ==========================================
// 红线: assigned_count == |students|, 不可单独设置
// 红线: |students| <= capacity
// 用途: 分配引擎容量门控
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::student::StudentId;
use crate::domain::types::FactoryType;

/// 工厂ID
pub type FactoryId = u32;

// ==========================================
// Factory - 工厂
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factory {
    // ===== 主键 =====
    pub id: FactoryId,
    pub name: String,

    // ===== 容量 =====
    pub capacity: u32, // 可容纳学生上限

    // ===== 分类与描述 =====
    #[serde(default)]
    pub factory_type: FactoryType,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,

    // ===== 成员 (有序, 不重复) =====
    // 装入名册时由学生引用重建
    #[serde(default, skip_deserializing)]
    students: Vec<StudentId>,
}

impl Factory {
    /// 创建空工厂
    pub fn new(id: FactoryId, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            factory_type: FactoryType::default(),
            address: None,
            phone: None,
            department: None,
            students: Vec::new(),
        }
    }

    pub fn with_type(mut self, factory_type: FactoryType) -> Self {
        self.factory_type = factory_type;
        self
    }

    /// 成员列表 (顺序即界面顺序)
    pub fn students(&self) -> &[StudentId] {
        &self.students
    }

    /// 已分配人数 (由成员列表派生)
    pub fn assigned_count(&self) -> u32 {
        self.students.len() as u32
    }

    pub fn contains(&self, student_id: StudentId) -> bool {
        self.students.contains(&student_id)
    }

    // ==========================================
    // 成员变更 (仅分配引擎 / 名册装载使用)
    // ==========================================

    /// 追加成员; 已存在时不重复追加
    pub(crate) fn admit(&mut self, student_id: StudentId) {
        if !self.contains(student_id) {
            self.students.push(student_id);
        }
    }

    /// 移除成员; 返回是否确实移除
    pub(crate) fn release(&mut self, student_id: StudentId) -> bool {
        match self.students.iter().position(|id| *id == student_id) {
            Some(index) => {
                self.students.remove(index);
                true
            }
            None => false,
        }
    }

    /// 列表内移动 (拖拽排序语义, 下标越界时夹取到边界)
    ///
    /// # 返回
    /// 顺序是否发生变化
    pub(crate) fn move_member(&mut self, from: usize, to: usize) -> bool {
        if self.students.is_empty() {
            return false;
        }
        let last = self.students.len() - 1;
        let from = from.min(last);
        let to = to.min(last);
        if from == to {
            return false;
        }
        let item = self.students.remove(from);
        self.students.insert(to, item);
        true
    }

    pub(crate) fn clear_members(&mut self) {
        self.students.clear();
    }
}

// ==========================================
// Trait: CapacityConstraint
// ==========================================
// 用途: 分配引擎容量检查接口
pub trait CapacityConstraint {
    /// 剩余可分配名额
    fn available_capacity(&self) -> u32;

    /// 是否可再容纳 count 名学生
    fn can_admit(&self, count: usize) -> bool;

    /// 是否已满
    fn is_full(&self) -> bool;

    /// 利用率 (0.0 - 1.0); 容量为 0 时返回 0.0
    fn utilization(&self) -> f64;
}

impl CapacityConstraint for Factory {
    fn available_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.assigned_count())
    }

    fn can_admit(&self, count: usize) -> bool {
        count <= self.available_capacity() as usize
    }

    fn is_full(&self) -> bool {
        self.assigned_count() >= self.capacity
    }

    fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.assigned_count() as f64 / self.capacity as f64
    }
}
