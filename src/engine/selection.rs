// ==========================================
// 学生实习分配系统 - 选择跟踪器
// ==========================================
// 职责: 单选 / Ctrl 多选 / Shift 范围选择 / 全选
// 输入: 当前可拖拽学生视图 (ID 序列, 视图顺序)
// 红线: 全选只作用于当前视图; 视图外学生的选择状态不变
// ==========================================

use tracing::{debug, instrument};

use crate::domain::student::StudentId;
use crate::domain::types::SelectModifier;
use crate::engine::error::{DistributionError, DistributionResult};
use crate::repository::roster_repo::RosterStore;

// ==========================================
// SelectionTracker - 选择跟踪器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    anchor: Option<StudentId>, // 最近一次点击的学生 (范围选择锚点)
    select_all: bool,          // 全选指示
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<StudentId> {
        self.anchor
    }

    pub fn is_all_selected(&self) -> bool {
        self.select_all
    }

    /// 切换全选模式并应用到当前视图
    ///
    /// # 返回
    /// 切换后的全选状态
    #[instrument(skip(self, store, view), fields(view_len = view.len()))]
    pub fn toggle_select_all(&mut self, store: &mut RosterStore, view: &[StudentId]) -> bool {
        self.select_all = !self.select_all;
        for id in view {
            if let Some(student) = store.student_mut(*id) {
                student.set_selected(self.select_all);
            }
        }
        debug!(select_all = self.select_all, "全选状态切换");
        self.select_all
    }

    /// 点击学生卡片
    ///
    /// 规则:
    /// 1) Plain: 反转被点击学生,其它学生不变
    /// 2) Ctrl: 同 Plain
    /// 3) Shift + 锚点: 锚点与被点击学生之间 (含两端, 与点击顺序无关) 全部置为选中
    ///    无锚点或锚点不在视图中时退化为 Plain
    /// 4) 之后锚点更新为被点击学生,并重算全选指示
    #[instrument(skip(self, store, view), fields(view_len = view.len()))]
    pub fn toggle_selection(
        &mut self,
        store: &mut RosterStore,
        view: &[StudentId],
        student_id: StudentId,
        modifier: SelectModifier,
    ) -> DistributionResult<()> {
        if store.find_student(student_id).is_none() {
            return Err(DistributionError::StudentNotFound(student_id));
        }
        // 只能点击当前视图中的学生 (已分配或被筛选隐藏的学生不可选)
        if !view.contains(&student_id) {
            return Err(DistributionError::InvalidInput(format!(
                "学生 {} 不在当前视图中",
                student_id
            )));
        }

        match modifier {
            SelectModifier::Ctrl => {
                // Ctrl/Cmd: 只切换被点击项
                Self::invert(store, student_id);
            }
            SelectModifier::Shift => match self.range_bounds(view, student_id) {
                Some((start, end)) => {
                    for id in &view[start..=end] {
                        if let Some(student) = store.student_mut(*id) {
                            student.set_selected(true);
                        }
                    }
                }
                None => Self::invert(store, student_id),
            },
            SelectModifier::Plain => {
                Self::invert(store, student_id);
            }
        }

        self.anchor = Some(student_id);
        self.recompute_select_all_flag(store, view);
        Ok(())
    }

    /// 重算全选指示: 视图非空且全部选中
    pub fn recompute_select_all_flag(&mut self, store: &RosterStore, view: &[StudentId]) -> bool {
        self.select_all = !view.is_empty()
            && view
                .iter()
                .all(|id| store.find_student(*id).is_some_and(|s| s.is_selected()));
        self.select_all
    }

    /// 清空名册中全部学生的选择状态
    pub fn clear_all(&mut self, store: &mut RosterStore) {
        for student in store.students_mut() {
            student.set_selected(false);
        }
        self.select_all = false;
        self.anchor = None;
    }

    /// 学生被删除后忘记锚点
    pub fn forget(&mut self, student_id: StudentId) {
        if self.anchor == Some(student_id) {
            self.anchor = None;
        }
    }

    fn range_bounds(&self, view: &[StudentId], clicked: StudentId) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        let anchor_index = view.iter().position(|id| *id == anchor)?;
        let clicked_index = view.iter().position(|id| *id == clicked)?;
        Some((
            anchor_index.min(clicked_index),
            anchor_index.max(clicked_index),
        ))
    }

    fn invert(store: &mut RosterStore, student_id: StudentId) {
        if let Some(student) = store.student_mut(student_id) {
            let selected = student.is_selected();
            student.set_selected(!selected);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::student::Student;
    use chrono::NaiveDate;

    fn store(count: u32) -> RosterStore {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let students = (1..=count)
            .map(|id| Student::new(id, format!("S{}", id), "Engineering", "Group A", "Stage 1", date))
            .collect();
        RosterStore::from_seed(students, vec![]).unwrap()
    }

    fn selected_ids(store: &RosterStore) -> Vec<StudentId> {
        store.selected_students().iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_plain_click_is_independent_toggle() {
        let mut store = store(3);
        let view = vec![1, 2, 3];
        let mut tracker = SelectionTracker::new();

        tracker.toggle_selection(&mut store, &view, 1, SelectModifier::Plain).unwrap();
        tracker.toggle_selection(&mut store, &view, 3, SelectModifier::Plain).unwrap();
        assert_eq!(selected_ids(&store), vec![1, 3]);

        tracker.toggle_selection(&mut store, &view, 1, SelectModifier::Plain).unwrap();
        assert_eq!(selected_ids(&store), vec![3]);
        assert_eq!(tracker.anchor(), Some(1));
    }

    #[test]
    fn test_shift_without_anchor_toggles_only_clicked() {
        let mut store = store(4);
        let view = vec![1, 2, 3, 4];
        let mut tracker = SelectionTracker::new();

        tracker.toggle_selection(&mut store, &view, 3, SelectModifier::Shift).unwrap();
        assert_eq!(selected_ids(&store), vec![3]);
    }

    #[test]
    fn test_shift_forces_selected_even_if_already_selected() {
        let mut store = store(4);
        let view = vec![1, 2, 3, 4];
        let mut tracker = SelectionTracker::new();

        tracker.toggle_selection(&mut store, &view, 2, SelectModifier::Plain).unwrap();
        tracker.toggle_selection(&mut store, &view, 2, SelectModifier::Shift).unwrap();
        // 范围 [2,2] 强制选中,而非反转
        assert_eq!(selected_ids(&store), vec![2]);
    }

    #[test]
    fn test_select_all_flag() {
        let mut store = store(2);
        let view = vec![1, 2];
        let mut tracker = SelectionTracker::new();

        assert!(!tracker.recompute_select_all_flag(&store, &[]));

        tracker.toggle_selection(&mut store, &view, 1, SelectModifier::Plain).unwrap();
        assert!(!tracker.is_all_selected());
        tracker.toggle_selection(&mut store, &view, 2, SelectModifier::Ctrl).unwrap();
        assert!(tracker.is_all_selected());
    }

    #[test]
    fn test_unknown_student_is_reported() {
        let mut store = store(1);
        let mut tracker = SelectionTracker::new();
        let result = tracker.toggle_selection(&mut store, &[1], 99, SelectModifier::Plain);
        assert!(matches!(result, Err(DistributionError::StudentNotFound(99))));
        assert_eq!(tracker.anchor(), None);
    }

    #[test]
    fn test_click_outside_view_is_rejected() {
        let mut store = store(3);
        let mut tracker = SelectionTracker::new();
        tracker.toggle_selection(&mut store, &[1, 2], 1, SelectModifier::Plain).unwrap();

        let result = tracker.toggle_selection(&mut store, &[1, 2], 3, SelectModifier::Ctrl);
        assert!(matches!(result, Err(DistributionError::InvalidInput(_))));
        assert_eq!(selected_ids(&store), vec![1]);
        assert_eq!(tracker.anchor(), Some(1));
    }
}
