// ==========================================
// 学生实习分配系统 - 领域类型定义
// ==========================================
// 职责: 工厂类型 / 选择修饰键 / 排序方式 / 操作类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 工厂类型 (Factory Type)
// ==========================================
// 序列化格式: PascalCase (与种子数据一致: "Internal" / "External")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FactoryType {
    #[default]
    Internal, // 校内实训工厂
    External, // 校外合作工厂
}

impl fmt::Display for FactoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactoryType::Internal => write!(f, "Internal"),
            FactoryType::External => write!(f, "External"),
        }
    }
}

impl FromStr for FactoryType {
    type Err = String;

    /// 大小写不敏感解析
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INTERNAL" => Ok(FactoryType::Internal),
            "EXTERNAL" => Ok(FactoryType::External),
            other => Err(format!("未知工厂类型: {}", other)),
        }
    }
}

// ==========================================
// 选择修饰键 (Select Modifier)
// ==========================================
// 点击学生卡片时按下的修饰键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectModifier {
    #[default]
    Plain, // 普通点击
    Ctrl,  // Ctrl / Cmd 点击
    Shift, // Shift 范围选择
}

impl SelectModifier {
    /// 由原始按键状态推导修饰键
    ///
    /// Ctrl/Cmd 优先于 Shift
    pub fn from_keys(ctrl_or_meta: bool, shift: bool) -> Self {
        if ctrl_or_meta {
            SelectModifier::Ctrl
        } else if shift {
            SelectModifier::Shift
        } else {
            SelectModifier::Plain
        }
    }
}

impl fmt::Display for SelectModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectModifier::Plain => write!(f, "PLAIN"),
            SelectModifier::Ctrl => write!(f, "CTRL"),
            SelectModifier::Shift => write!(f, "SHIFT"),
        }
    }
}

// ==========================================
// 名册排序方式 (Sort Order)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[default]
    Insertion, // 保持名册顺序
    Name,      // 按姓名
    Newest,    // 入学日期新 -> 旧
    Oldest,    // 入学日期旧 -> 新
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "" | "DEFAULT" | "INSERTION" => Ok(SortOrder::Insertion),
            "NAME" => Ok(SortOrder::Name),
            "NEWEST" => Ok(SortOrder::Newest),
            "OLDEST" => Ok(SortOrder::Oldest),
            other => Err(format!("未知排序方式: {}", other)),
        }
    }
}

// ==========================================
// 操作类型 (Action Type)
// ==========================================
// 用于操作日志审计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    BatchAssign,    // 批量分配
    Transfer,       // 单个拖拽转移
    Unassign,       // 移出工厂
    Reorder,        // 工厂内排序
    CreateFactory,  // 新建工厂
    AddStudent,     // 新增学生
    UpdateStudent,  // 编辑学生
    RemoveStudent,  // 删除学生
}

impl ActionType {
    /// 转换为存储用字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::BatchAssign => "BATCH_ASSIGN",
            ActionType::Transfer => "TRANSFER",
            ActionType::Unassign => "UNASSIGN",
            ActionType::Reorder => "REORDER",
            ActionType::CreateFactory => "CREATE_FACTORY",
            ActionType::AddStudent => "ADD_STUDENT",
            ActionType::UpdateStudent => "UPDATE_STUDENT",
            ActionType::RemoveStudent => "REMOVE_STUDENT",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
