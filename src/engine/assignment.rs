// ==========================================
// 学生实习分配系统 - 分配引擎
// ==========================================
// 红线: 容量约束优先; 批量分配全有或全无
// 红线: 任何时刻学生最多属于一个工厂, assigned_count 不出现负数或漂移
// ==========================================
// 职责: 批量分配 / 单个转移 / 移出 / 工厂内排序
// 输入: 名册 + 选择状态 + 落点工厂
// 输出: 更新后的名册 + 结构化结果
// ==========================================
// 并发说明: 单线程下每个操作天然不可打断;
// 多线程宿主必须将每次调用包在同一把锁内 (见 app::state)
// ==========================================

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::domain::factory::{CapacityConstraint, FactoryId};
use crate::domain::student::StudentId;
use crate::engine::error::{DistributionError, DistributionResult};
use crate::repository::roster_repo::RosterStore;

/// 批量分配结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAssignResult {
    pub factory_id: FactoryId,
    pub assigned: Vec<StudentId>, // 本次分配的学生 (名册顺序)
    pub assigned_count: u32,      // 分配后工厂人数
    pub available: u32,           // 分配后剩余名额
}

/// 单个转移结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferOutcome {
    /// 学生已移入目标工厂
    Moved {
        student_id: StudentId,
        from: Option<FactoryId>,
        to: FactoryId,
    },
    /// 学生本就属于目标工厂,未做任何修改
    Unchanged { student_id: StudentId, factory_id: FactoryId },
}

// ==========================================
// AssignmentEngine - 分配引擎
// ==========================================
#[derive(Debug, Default)]
pub struct AssignmentEngine {
    // 无状态引擎，不需要注入依赖
}

impl AssignmentEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 批量分配
    // ==========================================

    /// 将当前选中且未分配的学生批量分配到目标工厂
    ///
    /// 成功后清空整个名册的选择状态; 失败时不修改任何状态
    /// 选择为空时视为成功的空操作
    #[instrument(skip(self, store))]
    pub fn batch_assign(
        &self,
        store: &mut RosterStore,
        target: FactoryId,
    ) -> DistributionResult<BatchAssignResult> {
        let candidates: Vec<StudentId> = store
            .students()
            .iter()
            .filter(|s| s.is_selected() && !s.is_assigned())
            .map(|s| s.id)
            .collect();

        let result = self.assign_students(store, &candidates, target)?;

        for student in store.students_mut() {
            student.set_selected(false);
        }

        Ok(result)
    }

    /// 将指定学生批量分配到目标工厂 (全有或全无)
    ///
    /// 规则:
    /// 1) 目标工厂必须存在, 所有学生必须存在
    /// 2) 已分配的学生不参与本次分配,也不占用名额
    /// 3) 待分配人数 > 剩余名额 → CapacityExceeded,不做任何修改
    #[instrument(skip(self, store, student_ids), fields(requested = student_ids.len()))]
    pub fn assign_students(
        &self,
        store: &mut RosterStore,
        student_ids: &[StudentId],
        target: FactoryId,
    ) -> DistributionResult<BatchAssignResult> {
        let factory = store
            .find_factory(target)
            .ok_or(DistributionError::FactoryNotFound(target))?;

        let mut pending: Vec<StudentId> = Vec::with_capacity(student_ids.len());
        for id in student_ids {
            let student = store
                .find_student(*id)
                .ok_or(DistributionError::StudentNotFound(*id))?;
            if !student.is_assigned() && !pending.contains(id) {
                pending.push(*id);
            }
        }

        if !factory.can_admit(pending.len()) {
            let err = DistributionError::capacity_exceeded(factory, pending.len());
            warn!(factory_id = target, error = %err, "批量分配被拒绝");
            return Err(err);
        }

        // 门控全部通过后才开始修改
        for id in &pending {
            if let Some(student) = store.student_mut(*id) {
                student.set_assigned_factory(Some(target));
            }
        }
        let factory = store
            .factory_mut(target)
            .ok_or(DistributionError::FactoryNotFound(target))?;
        for id in &pending {
            factory.admit(*id);
        }

        let result = BatchAssignResult {
            factory_id: target,
            assigned: pending,
            assigned_count: factory.assigned_count(),
            available: factory.available_capacity(),
        };

        info!(
            factory_id = target,
            assigned = result.assigned.len(),
            assigned_count = result.assigned_count,
            "批量分配完成"
        );
        Ok(result)
    }

    // ==========================================
    // 单个转移
    // ==========================================

    /// 拖拽单个学生到目标工厂 (可来自未分配区或其它工厂)
    ///
    /// 规则:
    /// 1) 已属于目标工厂 → Unchanged (排序范畴,不做容量检查)
    /// 2) 目标工厂已满 → CapacityExceeded,不做任何修改
    /// 3) 先从原工厂释放,再加入目标工厂
    #[instrument(skip(self, store))]
    pub fn transfer(
        &self,
        store: &mut RosterStore,
        student_id: StudentId,
        target: FactoryId,
    ) -> DistributionResult<TransferOutcome> {
        let student = store
            .find_student(student_id)
            .ok_or(DistributionError::StudentNotFound(student_id))?;
        let from = student.assigned_factory();

        let factory = store
            .find_factory(target)
            .ok_or(DistributionError::FactoryNotFound(target))?;

        if from == Some(target) {
            return Ok(TransferOutcome::Unchanged {
                student_id,
                factory_id: target,
            });
        }

        if factory.is_full() {
            let err = DistributionError::capacity_exceeded(factory, 1);
            warn!(student_id, factory_id = target, error = %err, "转移被拒绝");
            return Err(err);
        }

        // 先释放,后加入
        if let Some(previous) = from {
            if let Some(previous_factory) = store.factory_mut(previous) {
                previous_factory.release(student_id);
            }
        }
        if let Some(student) = store.student_mut(student_id) {
            student.set_assigned_factory(Some(target));
            student.set_selected(false);
        }
        if let Some(factory) = store.factory_mut(target) {
            factory.admit(student_id);
        }

        info!(student_id, from = ?from, to = target, "学生转移完成");
        Ok(TransferOutcome::Moved {
            student_id,
            from,
            to: target,
        })
    }

    // ==========================================
    // 移出工厂
    // ==========================================

    /// 将学生移出所属工厂 (无容量检查)
    ///
    /// # 返回
    /// 原所属工厂ID
    #[instrument(skip(self, store))]
    pub fn unassign(
        &self,
        store: &mut RosterStore,
        student_id: StudentId,
    ) -> DistributionResult<FactoryId> {
        let student = store
            .find_student(student_id)
            .ok_or(DistributionError::StudentNotFound(student_id))?;
        let factory_id = student
            .assigned_factory()
            .ok_or(DistributionError::NotAssigned(student_id))?;

        if let Some(factory) = store.factory_mut(factory_id) {
            factory.release(student_id);
        }
        if let Some(student) = store.student_mut(student_id) {
            student.set_assigned_factory(None);
        }

        info!(student_id, factory_id, "学生已移出工厂");
        Ok(factory_id)
    }

    // ==========================================
    // 工厂内排序
    // ==========================================

    /// 同一工厂内拖拽排序 (无容量检查, 不改变归属)
    ///
    /// # 返回
    /// 顺序是否发生变化 (夹取后起止相同或工厂为空时为 false)
    #[instrument(skip(self, store))]
    pub fn reorder(
        &self,
        store: &mut RosterStore,
        factory_id: FactoryId,
        from_index: usize,
        to_index: usize,
    ) -> DistributionResult<bool> {
        let factory = store
            .factory_mut(factory_id)
            .ok_or(DistributionError::FactoryNotFound(factory_id))?;
        Ok(factory.move_member(from_index, to_index))
    }
}
