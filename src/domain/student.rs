// ==========================================
// 学生实习分配系统 - 学生领域模型
// ==========================================
// 红线: assigned_factory 只能由分配引擎改写
// 红线: selected 仅为界面选择状态,不属于业务状态
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::factory::FactoryId;

/// 学生ID
pub type StudentId = u32;

// ==========================================
// Student - 学生
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    // ===== 主键 =====
    pub id: StudentId, // 学生ID (唯一, 不可变)

    // ===== 基本信息 =====
    pub name: String,       // 姓名
    pub department: String, // 院系
    pub group: String,      // 班组 / 批次
    pub stage: String,      // 阶段
    pub enrolled_on: NaiveDate, // 入学日期

    // ===== 分配状态 =====
    #[serde(default)]
    assigned_factory: Option<FactoryId>, // 所属工厂 (None = 未分配)

    // ===== 界面状态 =====
    #[serde(default)]
    selected: bool,
}

impl Student {
    /// 创建未分配、未选中的学生
    pub fn new(
        id: StudentId,
        name: impl Into<String>,
        department: impl Into<String>,
        group: impl Into<String>,
        stage: impl Into<String>,
        enrolled_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            department: department.into(),
            group: group.into(),
            stage: stage.into(),
            enrolled_on,
            assigned_factory: None,
            selected: false,
        }
    }

    /// 种子数据使用: 携带初始分配引用
    ///
    /// 引用在装入名册时会重新校验 (工厂存在 + 容量),不合法则丢弃
    pub fn with_assignment(mut self, factory_id: FactoryId) -> Self {
        self.assigned_factory = Some(factory_id);
        self
    }

    pub fn assigned_factory(&self) -> Option<FactoryId> {
        self.assigned_factory
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_factory.is_some()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_assigned_factory(&mut self, factory_id: Option<FactoryId>) {
        self.assigned_factory = factory_id;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
