// ==========================================
// 学生实习分配系统 - 操作日志仓储
// ==========================================
// 职责: 操作日志的追加与查询
// 存储: 内存 (追加写, 按时间顺序)
// ==========================================

use crate::domain::action_log::ActionLog;
use crate::domain::types::ActionType;

// ==========================================
// ActionLogRepository - 操作日志仓储
// ==========================================
#[derive(Debug, Default)]
pub struct ActionLogRepository {
    logs: Vec<ActionLog>,
}

impl ActionLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条日志
    pub fn insert(&mut self, log: ActionLog) {
        self.logs.push(log);
    }

    /// 按 action_id 查询单个日志
    pub fn find_by_id(&self, action_id: &str) -> Option<&ActionLog> {
        self.logs.iter().find(|log| log.action_id == action_id)
    }

    /// 查询指定类型的日志 (旧 -> 新)
    pub fn find_by_type(&self, action_type: ActionType) -> Vec<&ActionLog> {
        self.logs
            .iter()
            .filter(|log| log.action_type == action_type)
            .collect()
    }

    /// 查询最近 limit 条日志 (新 -> 旧)
    pub fn find_recent(&self, limit: usize) -> Vec<&ActionLog> {
        self.logs.iter().rev().take(limit).collect()
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_recent_is_newest_first() {
        let mut repo = ActionLogRepository::new();
        repo.insert(ActionLog::new(ActionType::AddStudent, "admin", "first"));
        repo.insert(ActionLog::new(ActionType::Transfer, "admin", "second"));
        repo.insert(ActionLog::new(ActionType::Unassign, "admin", "third"));

        let recent = repo.find_recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].detail, "third");
        assert_eq!(recent[1].detail, "second");

        assert_eq!(repo.find_by_type(ActionType::Transfer).len(), 1);
        let id = recent[0].action_id.clone();
        assert!(repo.find_by_id(&id).is_some());
    }
}
