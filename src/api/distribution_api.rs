// ==========================================
// 学生实习分配系统 - 分配 API
// ==========================================
// 职责: 对外暴露名册视图与全部分配操作
// 红线: 每个操作先过身份验证门控
// 红线: 所有成功的修改记录 ActionLog
// ==========================================
// 持有: 名册 + 筛选条件 + 选择状态 + 操作日志
// 视图: 每次调用时从名册重新计算,不缓存
// ==========================================

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::api::auth::AuthGate;
use crate::api::error::{ApiError, ApiResult};
use crate::config::DistributionConfig;
use crate::domain::action_log::ActionLog;
use crate::domain::factory::{Factory, FactoryId};
use crate::domain::student::{Student, StudentId};
use crate::domain::types::{ActionType, SelectModifier};
use crate::engine::{
    AssignmentEngine, BatchAssignResult, FactoryDraft, FactoryRegistry, FilterCriteria,
    FilterEngine, RosterPage, RosterQuery, RosterStatistics, SelectionTracker, StatisticsEngine,
    StudentAdmin, StudentDraft, StudentPatch, TransferOutcome,
};
use crate::export::CsvRosterExporter;
use crate::importer::{CsvRosterImporter, RosterSource};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::roster_repo::RosterStore;

/// 拖放结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropOutcome {
    /// 被拖学生属于当前选择 → 批量分配
    Batch(BatchAssignResult),
    /// 单个转移
    Transfer(TransferOutcome),
}

// ==========================================
// DistributionApi - 分配 API
// ==========================================

/// 分配API
///
/// 职责：
/// 1. 筛选视图 / 名册列表 / 统计
/// 2. 选择 (单选 / 多选 / 范围 / 全选)
/// 3. 批量分配 / 转移 / 移出 / 排序
/// 4. 工厂登记与学生维护
/// 5. CSV 导入导出
/// 6. ActionLog记录
pub struct DistributionApi {
    store: RosterStore,
    criteria: FilterCriteria,
    selection: SelectionTracker,
    action_log_repo: ActionLogRepository,
    filter_engine: FilterEngine,
    assignment_engine: AssignmentEngine,
    registry: FactoryRegistry,
    student_admin: StudentAdmin,
    statistics_engine: StatisticsEngine,
    exporter: CsvRosterExporter,
    config: DistributionConfig,
    auth: Arc<dyn AuthGate>,
}

impl DistributionApi {
    /// 创建新的DistributionApi实例
    ///
    /// # 参数
    /// - store: 已装载的名册
    /// - config: 分配配置
    /// - auth: 身份验证门控
    pub fn new(
        store: RosterStore,
        config: DistributionConfig,
        auth: Arc<dyn AuthGate>,
    ) -> ApiResult<Self> {
        config
            .validate()
            .map_err(|e| ApiError::InvalidInput(format!("配置非法: {}", e)))?;
        let registry = FactoryRegistry::new(&config)?;
        let exporter = CsvRosterExporter::new(&config.export_date_format)?;

        Ok(Self {
            store,
            criteria: FilterCriteria::all(),
            selection: SelectionTracker::new(),
            action_log_repo: ActionLogRepository::new(),
            filter_engine: FilterEngine::new(),
            assignment_engine: AssignmentEngine::new(),
            registry,
            student_admin: StudentAdmin::new(),
            statistics_engine: StatisticsEngine::new(),
            exporter,
            config,
            auth,
        })
    }

    /// 从数据源装载名册并创建实例
    pub fn from_source(
        source: &dyn RosterSource,
        config: DistributionConfig,
        auth: Arc<dyn AuthGate>,
    ) -> ApiResult<Self> {
        let store = source.load()?.into_store()?;
        info!(
            source = %source.describe(),
            students = store.students().len(),
            factories = store.factories().len(),
            "名册装载完成"
        );
        Self::new(store, config, auth)
    }

    // ==========================================
    // 门控与内部辅助
    // ==========================================

    fn ensure_authenticated(&self) -> ApiResult<()> {
        if self.auth.is_authenticated() {
            Ok(())
        } else {
            debug!("未登录请求被拒绝");
            Err(ApiError::Unauthenticated)
        }
    }

    fn view_ids(&self) -> Vec<StudentId> {
        self.filter_engine
            .filtered_student_ids(&self.store, &self.criteria)
    }

    fn refresh_select_all(&mut self) {
        let view = self.view_ids();
        self.selection.recompute_select_all_flag(&self.store, &view);
    }

    fn record(&mut self, action_type: ActionType, detail: String, payload: serde_json::Value) {
        let log = ActionLog::new(action_type, &self.config.actor, detail).with_payload(payload);
        self.action_log_repo.insert(log);
    }

    // ==========================================
    // 只读访问
    // ==========================================

    /// 名册只读视图
    pub fn roster(&self) -> &RosterStore {
        &self.store
    }

    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected()
    }

    // ==========================================
    // 筛选视图
    // ==========================================

    /// 更新筛选条件
    ///
    /// 被隐藏学生的选择状态保持不变; 全选指示按新视图重算
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> ApiResult<()> {
        self.ensure_authenticated()?;
        self.criteria = criteria;
        self.refresh_select_all();
        Ok(())
    }

    /// 可拖拽学生视图 (未分配且匹配筛选条件)
    pub fn filtered_students(&self) -> ApiResult<Vec<&Student>> {
        self.ensure_authenticated()?;
        Ok(self.filter_engine.filter_students(&self.store, &self.criteria))
    }

    /// 工厂视图 (类型与名称匹配)
    pub fn filtered_factories(&self) -> ApiResult<Vec<&Factory>> {
        self.ensure_authenticated()?;
        Ok(self
            .filter_engine
            .filter_factories(&self.store, &self.criteria))
    }

    /// 当前全部选中学生 (含被筛选隐藏的)
    pub fn selected_students(&self) -> ApiResult<Vec<&Student>> {
        self.ensure_authenticated()?;
        Ok(self.store.selected_students())
    }

    /// 名册列表视图 (含已分配学生)
    pub fn roster_view(&self, query: &RosterQuery) -> ApiResult<Vec<&Student>> {
        self.ensure_authenticated()?;
        Ok(self.filter_engine.roster_view(&self.store, query))
    }

    /// 名册列表分页 (每页行数取自配置)
    pub fn roster_page(&self, query: &RosterQuery, page: usize) -> ApiResult<RosterPage<'_>> {
        self.ensure_authenticated()?;
        Ok(self.filter_engine.roster_page(
            &self.store,
            query,
            page,
            self.config.roster_page_size,
        )?)
    }

    /// 名册统计
    pub fn statistics(&self) -> ApiResult<RosterStatistics> {
        self.ensure_authenticated()?;
        Ok(self.statistics_engine.compute(&self.store))
    }

    // ==========================================
    // 选择
    // ==========================================

    /// 切换全选 (只作用于当前筛选视图)
    ///
    /// # 返回
    /// 切换后的全选状态
    pub fn toggle_select_all(&mut self) -> ApiResult<bool> {
        self.ensure_authenticated()?;
        let view = self.view_ids();
        Ok(self.selection.toggle_select_all(&mut self.store, &view))
    }

    /// 点击学生卡片
    ///
    /// # 参数
    /// - student_id: 被点击学生
    /// - modifier: 按键修饰 (见 SelectModifier::from_keys)
    pub fn toggle_selection(
        &mut self,
        student_id: StudentId,
        modifier: SelectModifier,
    ) -> ApiResult<()> {
        self.ensure_authenticated()?;
        let view = self.view_ids();
        self.selection
            .toggle_selection(&mut self.store, &view, student_id, modifier)?;
        Ok(())
    }

    /// 清空选择
    pub fn clear_selection(&mut self) -> ApiResult<()> {
        self.ensure_authenticated()?;
        self.selection.clear_all(&mut self.store);
        Ok(())
    }

    // ==========================================
    // 分配
    // ==========================================

    /// 学生卡片落到工厂
    ///
    /// 被拖学生已选中且未分配 → 批量分配当前选择; 否则 → 单个转移
    pub fn drop_on_factory(
        &mut self,
        dragged: StudentId,
        target: FactoryId,
    ) -> ApiResult<DropOutcome> {
        self.ensure_authenticated()?;
        let student = self
            .store
            .find_student(dragged)
            .ok_or_else(|| ApiError::NotFound(format!("Student(id={})不存在", dragged)))?;

        if student.is_selected() && !student.is_assigned() {
            self.batch_assign_selected(target).map(DropOutcome::Batch)
        } else {
            self.transfer_student(dragged, target)
                .map(DropOutcome::Transfer)
        }
    }

    /// 将当前选中且未分配的学生批量分配到目标工厂
    ///
    /// # 返回
    /// - Ok(BatchAssignResult): 分配结果 (选择为空时为空结果)
    /// - Err(ApiError::CapacityExceeded): 名额不足,名册与选择均未修改
    pub fn batch_assign_selected(&mut self, target: FactoryId) -> ApiResult<BatchAssignResult> {
        self.ensure_authenticated()?;
        let result = self.assignment_engine.batch_assign(&mut self.store, target)?;
        self.selection.clear_all(&mut self.store);

        if !result.assigned.is_empty() {
            let factory_name = self
                .store
                .find_factory(target)
                .map(|f| f.name.clone())
                .unwrap_or_default();
            self.record(
                ActionType::BatchAssign,
                format!("{} 名学生分配到 {}", result.assigned.len(), factory_name),
                json!({
                    "factory_id": target,
                    "student_ids": result.assigned,
                    "assigned_count": result.assigned_count,
                }),
            );
        }
        self.refresh_select_all();
        Ok(result)
    }

    /// 单个学生转移到目标工厂
    pub fn transfer_student(
        &mut self,
        student_id: StudentId,
        target: FactoryId,
    ) -> ApiResult<TransferOutcome> {
        self.ensure_authenticated()?;
        let outcome = self
            .assignment_engine
            .transfer(&mut self.store, student_id, target)?;

        if let TransferOutcome::Moved { from, to, .. } = &outcome {
            self.selection.forget(student_id);
            self.record(
                ActionType::Transfer,
                format!("学生 {} 转移到工厂 {}", student_id, to),
                json!({ "student_id": student_id, "from": from, "to": to }),
            );
        }
        self.refresh_select_all();
        Ok(outcome)
    }

    /// 将学生移出所属工厂
    ///
    /// # 返回
    /// 原所属工厂ID
    pub fn unassign_student(&mut self, student_id: StudentId) -> ApiResult<FactoryId> {
        self.ensure_authenticated()?;
        let factory_id = self
            .assignment_engine
            .unassign(&mut self.store, student_id)?;
        self.record(
            ActionType::Unassign,
            format!("学生 {} 移出工厂 {}", student_id, factory_id),
            json!({ "student_id": student_id, "factory_id": factory_id }),
        );
        self.refresh_select_all();
        Ok(factory_id)
    }

    /// 同一工厂内拖拽排序
    ///
    /// # 返回
    /// 顺序是否发生变化 (未变化时不记日志)
    pub fn reorder_factory(
        &mut self,
        factory_id: FactoryId,
        from_index: usize,
        to_index: usize,
    ) -> ApiResult<bool> {
        self.ensure_authenticated()?;
        let moved = self
            .assignment_engine
            .reorder(&mut self.store, factory_id, from_index, to_index)?;
        if moved {
            self.record(
                ActionType::Reorder,
                format!("工厂 {} 内排序 {} → {}", factory_id, from_index, to_index),
                json!({ "factory_id": factory_id, "from": from_index, "to": to_index }),
            );
        }
        Ok(moved)
    }

    // ==========================================
    // 工厂与学生维护
    // ==========================================

    /// 登记新工厂
    ///
    /// # 返回
    /// - Ok(Factory): 新工厂
    /// - Err(ApiError::ValidationFailed): 全部违规字段,名册未修改
    pub fn add_factory(&mut self, draft: &FactoryDraft) -> ApiResult<Factory> {
        self.ensure_authenticated()?;
        let factory = self.registry.create_factory(&mut self.store, draft)?;
        self.record(
            ActionType::CreateFactory,
            format!("登记工厂 {}", factory.name),
            json!({
                "factory_id": factory.id,
                "name": factory.name,
                "capacity": factory.capacity,
                "factory_type": factory.factory_type.to_string(),
            }),
        );
        Ok(factory)
    }

    /// 新增学生
    pub fn add_student(&mut self, draft: &StudentDraft) -> ApiResult<Student> {
        self.ensure_authenticated()?;
        let student = self.student_admin.add_student(&mut self.store, draft)?;
        self.record(
            ActionType::AddStudent,
            format!("新增学生 {}", student.name),
            json!({ "student_id": student.id, "name": student.name }),
        );
        self.refresh_select_all();
        Ok(student)
    }

    /// 编辑学生基本信息 (不改变分配)
    pub fn update_student(
        &mut self,
        student_id: StudentId,
        patch: &StudentPatch,
    ) -> ApiResult<Student> {
        self.ensure_authenticated()?;
        let student = self
            .student_admin
            .update_student(&mut self.store, student_id, patch)?;
        self.record(
            ActionType::UpdateStudent,
            format!("编辑学生 {}", student.id),
            serde_json::to_value(patch).map_err(|e| ApiError::InternalError(e.to_string()))?,
        );
        self.refresh_select_all();
        Ok(student)
    }

    /// 删除学生 (先释放工厂名额)
    pub fn remove_student(&mut self, student_id: StudentId) -> ApiResult<Student> {
        self.ensure_authenticated()?;
        let removed = self
            .student_admin
            .remove_student(&mut self.store, student_id)?;
        self.selection.forget(student_id);
        self.record(
            ActionType::RemoveStudent,
            format!("删除学生 {}", removed.name),
            json!({ "student_id": removed.id, "factory_id": removed.assigned_factory() }),
        );
        self.refresh_select_all();
        Ok(removed)
    }

    /// 删除全部选中学生
    pub fn remove_selected_students(&mut self) -> ApiResult<Vec<StudentId>> {
        self.ensure_authenticated()?;
        let removed = self.student_admin.remove_selected(&mut self.store)?;
        for id in &removed {
            self.selection.forget(*id);
        }
        if !removed.is_empty() {
            self.record(
                ActionType::RemoveStudent,
                format!("删除 {} 名选中学生", removed.len()),
                json!({ "student_ids": removed }),
            );
        }
        self.refresh_select_all();
        Ok(removed)
    }

    // ==========================================
    // 导入导出
    // ==========================================

    /// 从 CSV 导入学生 (先读取全部行,任一行非法则不导入)
    pub fn import_students_csv(&mut self, path: &Path) -> ApiResult<Vec<Student>> {
        self.ensure_authenticated()?;
        let drafts = CsvRosterImporter::new().read_students(path)?;

        let mut added = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            added.push(self.student_admin.add_student(&mut self.store, draft)?);
        }
        if !added.is_empty() {
            let ids: Vec<StudentId> = added.iter().map(|s| s.id).collect();
            self.record(
                ActionType::AddStudent,
                format!("CSV 导入 {} 名学生", added.len()),
                json!({ "source": path.display().to_string(), "student_ids": ids }),
            );
        }
        self.refresh_select_all();
        Ok(added)
    }

    /// 将名册列表视图 (含已分配学生) 导出为 CSV 字符串
    pub fn export_roster_csv(&self, query: &RosterQuery) -> ApiResult<String> {
        self.ensure_authenticated()?;
        let rows = self.filter_engine.roster_view(&self.store, query);
        Ok(self.exporter.to_csv_string(&self.store, &rows)?)
    }

    /// 将名册列表视图导出到文件
    ///
    /// # 返回
    /// 导出的数据行数
    pub fn export_roster_to(&self, path: &Path, query: &RosterQuery) -> ApiResult<usize> {
        self.ensure_authenticated()?;
        let rows = self.filter_engine.roster_view(&self.store, query);
        Ok(self.exporter.write_file(path, &self.store, &rows)?)
    }

    // ==========================================
    // 操作日志
    // ==========================================

    /// 最近的操作日志 (新的在前)
    pub fn recent_actions(&self, limit: usize) -> ApiResult<Vec<&ActionLog>> {
        self.ensure_authenticated()?;
        Ok(self.action_log_repo.find_recent(limit))
    }

    /// 按类型查询操作日志
    pub fn actions_by_type(&self, action_type: ActionType) -> ApiResult<Vec<&ActionLog>> {
        self.ensure_authenticated()?;
        Ok(self.action_log_repo.find_by_type(action_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::StaticAuth;
    use crate::importer::SeedRosterSource;

    fn api() -> DistributionApi {
        DistributionApi::from_source(
            &SeedRosterSource,
            DistributionConfig::default(),
            Arc::new(StaticAuth::signed_in()),
        )
        .unwrap()
    }

    #[test]
    fn test_signed_out_is_rejected() {
        let auth = Arc::new(StaticAuth::signed_out());
        let mut api = DistributionApi::from_source(
            &SeedRosterSource,
            DistributionConfig::default(),
            auth.clone(),
        )
        .unwrap();

        assert!(matches!(api.filtered_students(), Err(ApiError::Unauthenticated)));
        assert!(matches!(api.transfer_student(1, 1), Err(ApiError::Unauthenticated)));

        auth.set_authenticated(true);
        assert_eq!(api.filtered_students().unwrap().len(), 5);
    }

    #[test]
    fn test_drop_routes_selected_to_batch() {
        let mut api = api();
        api.toggle_selection(1, SelectModifier::Plain).unwrap();
        api.toggle_selection(2, SelectModifier::Ctrl).unwrap();

        let outcome = api.drop_on_factory(1, 1).unwrap();
        match outcome {
            DropOutcome::Batch(result) => assert_eq!(result.assigned, vec![1, 2]),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(api.selected_students().unwrap().is_empty());
        assert_eq!(api.actions_by_type(ActionType::BatchAssign).unwrap().len(), 1);
    }

    #[test]
    fn test_drop_unselected_is_single_transfer() {
        let mut api = api();
        api.toggle_selection(2, SelectModifier::Plain).unwrap();

        let outcome = api.drop_on_factory(3, 2).unwrap();
        assert!(matches!(outcome, DropOutcome::Transfer(TransferOutcome::Moved { to: 2, .. })));
        // 其它学生的选择不受影响
        assert_eq!(api.selected_students().unwrap()[0].id, 2);
    }

    #[test]
    fn test_failed_batch_keeps_selection() {
        let mut api = api();
        api.toggle_select_all().unwrap();

        let err = api.batch_assign_selected(2).unwrap_err();
        assert!(matches!(err, ApiError::CapacityExceeded { shortfall: 3, .. }));
        assert_eq!(api.selected_students().unwrap().len(), 5);
        assert!(api.is_all_selected());
        assert!(api.recent_actions(10).unwrap().is_empty());
    }
}
