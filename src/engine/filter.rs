// ==========================================
// 学生实习分配系统 - 过滤引擎
// ==========================================
// 职责: 由名册 + 过滤条件派生视图
// 输入: RosterStore + FilterCriteria
// 输出: 未分配且匹配的学生 / 类型与名称匹配的工厂
// 红线: 纯函数,不修改名册
// ==========================================

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::factory::{Factory, FactoryId};
use crate::domain::student::{Student, StudentId};
use crate::domain::types::{FactoryType, SortOrder};
use crate::engine::error::{DistributionError, DistributionResult};
use crate::repository::roster_repo::RosterStore;

/// 下拉框中表示"不限"的取值
pub const ALL_CHOICE: &str = "All";

/// 将下拉框取值归一化: "All" / 空白 视为不限
pub fn choice(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CHOICE) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_choice(value: &str, criterion: &Option<String>) -> bool {
    criterion.as_deref().map_or(true, |expected| value == expected)
}

// ==========================================
// FilterCriteria - 分配页过滤条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    // ===== 学生条件 =====
    pub department: Option<String>,
    pub stage: Option<String>,
    pub group: Option<String>,
    pub search: String, // 姓名模糊搜索

    // ===== 工厂条件 =====
    pub factory_type: Option<FactoryType>,
    pub factory_search: String, // 工厂名模糊搜索
}

impl FilterCriteria {
    /// 不限任何条件
    pub fn all() -> Self {
        Self::default()
    }

    pub fn department(mut self, value: &str) -> Self {
        self.department = choice(value);
        self
    }

    pub fn stage(mut self, value: &str) -> Self {
        self.stage = choice(value);
        self
    }

    pub fn group(mut self, value: &str) -> Self {
        self.group = choice(value);
        self
    }

    pub fn search(mut self, value: &str) -> Self {
        self.search = value.trim().to_string();
        self
    }

    pub fn factory_search(mut self, value: &str) -> Self {
        self.factory_search = value.trim().to_string();
        self
    }

    pub fn factory_type(mut self, value: Option<FactoryType>) -> Self {
        self.factory_type = value;
        self
    }

    /// 由下拉框文本设置工厂类型 ("All" / 空白 = 不限)
    pub fn factory_type_choice(self, value: &str) -> DistributionResult<Self> {
        let parsed = match choice(value) {
            Some(text) => Some(
                text.parse::<FactoryType>()
                    .map_err(DistributionError::InvalidInput)?,
            ),
            None => None,
        };
        Ok(self.factory_type(parsed))
    }

    /// 学生是否满足条件 (不含"未分配"约束)
    pub fn matches_student(&self, student: &Student) -> bool {
        matches_choice(&student.department, &self.department)
            && matches_choice(&student.stage, &self.stage)
            && matches_choice(&student.group, &self.group)
            && contains_ignore_case(&student.name, &self.search)
    }

    /// 工厂是否满足条件
    pub fn matches_factory(&self, factory: &Factory) -> bool {
        self.factory_type.map_or(true, |t| factory.factory_type == t)
            && contains_ignore_case(&factory.name, &self.factory_search)
    }
}

// ==========================================
// RosterQuery - 名册列表查询 (管理首页)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterQuery {
    pub department: Option<String>,
    pub stage: Option<String>,
    pub group: Option<String>,
    pub factory: Option<FactoryId>,
    pub search: String, // 全字段模糊搜索
    pub sort: SortOrder,
}

/// 名册列表的一页
#[derive(Debug, Clone, PartialEq)]
pub struct RosterPage<'a> {
    pub rows: Vec<&'a Student>,
    pub page: usize,        // 当前页 (从 1 开始, 已夹取到有效范围)
    pub per_page: usize,
    pub total_rows: usize,
    pub total_pages: usize, // 无数据时为 0
}

// ==========================================
// FilterEngine - 过滤引擎
// ==========================================
#[derive(Debug, Default)]
pub struct FilterEngine {
    // 无状态引擎
}

impl FilterEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 可拖拽学生视图: 条件全部匹配且未分配 (名册顺序)
    pub fn filter_students<'a>(
        &self,
        store: &'a RosterStore,
        criteria: &FilterCriteria,
    ) -> Vec<&'a Student> {
        store
            .students()
            .iter()
            .filter(|s| !s.is_assigned() && criteria.matches_student(s))
            .collect()
    }

    /// 可拖拽学生视图的ID序列 (供选择器按下标计算范围)
    pub fn filtered_student_ids(
        &self,
        store: &RosterStore,
        criteria: &FilterCriteria,
    ) -> Vec<StudentId> {
        self.filter_students(store, criteria)
            .into_iter()
            .map(|s| s.id)
            .collect()
    }

    /// 工厂视图: 类型匹配且名称包含搜索词
    pub fn filter_factories<'a>(
        &self,
        store: &'a RosterStore,
        criteria: &FilterCriteria,
    ) -> Vec<&'a Factory> {
        store
            .factories()
            .iter()
            .filter(|f| criteria.matches_factory(f))
            .collect()
    }

    /// 名册列表视图: 含已分配学生,支持全字段搜索与排序
    pub fn roster_view<'a>(&self, store: &'a RosterStore, query: &RosterQuery) -> Vec<&'a Student> {
        let needle = query.search.trim().to_lowercase();

        let mut rows: Vec<&Student> = store
            .students()
            .iter()
            .filter(|s| {
                matches_choice(&s.department, &query.department)
                    && matches_choice(&s.stage, &query.stage)
                    && matches_choice(&s.group, &query.group)
                    && query
                        .factory
                        .map_or(true, |id| s.assigned_factory() == Some(id))
            })
            .filter(|s| needle.is_empty() || searchable_text(store, s).contains(&needle))
            .collect();

        // 稳定排序,相等元素保持名册顺序
        match query.sort {
            SortOrder::Insertion => {}
            SortOrder::Name => rows.sort_by(|a, b| compare_names(a, b)),
            SortOrder::Newest => rows.sort_by(|a, b| b.enrolled_on.cmp(&a.enrolled_on)),
            SortOrder::Oldest => rows.sort_by(|a, b| a.enrolled_on.cmp(&b.enrolled_on)),
        }

        rows
    }

    /// 名册列表分页
    ///
    /// 页码越界时夹取到 [1, total_pages]
    pub fn roster_page<'a>(
        &self,
        store: &'a RosterStore,
        query: &RosterQuery,
        page: usize,
        per_page: usize,
    ) -> DistributionResult<RosterPage<'a>> {
        if per_page == 0 {
            return Err(DistributionError::InvalidInput("每页行数必须大于 0".to_string()));
        }

        let rows = self.roster_view(store, query);
        let total_rows = rows.len();
        let total_pages = total_rows.div_ceil(per_page);
        let page = page.clamp(1, total_pages.max(1));

        Ok(RosterPage {
            rows: rows
                .into_iter()
                .skip((page - 1) * per_page)
                .take(per_page)
                .collect(),
            page,
            per_page,
            total_rows,
            total_pages,
        })
    }
}

fn searchable_text(store: &RosterStore, student: &Student) -> String {
    format!(
        "{}\n{}\n{}\n{}\n{}\n{}\n{}",
        student.id,
        student.name,
        student.department,
        student.group,
        student.stage,
        store.factory_name_of(student).unwrap_or_default(),
        student.enrolled_on
    )
    .to_lowercase()
}

fn compare_names(a: &Student, b: &Student) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn store() -> RosterStore {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let students = vec![
            Student::new(1, "Ahmed Mohamed", "Engineering", "Group A", "Stage 1", date),
            Student::new(2, "Sara Ahmed", "Science", "Group B", "Stage 2", date),
            Student::new(3, "Omar Ali", "Engineering", "Group A", "Stage 1", date).with_assignment(1),
        ];
        let factories = vec![
            Factory::new(1, "Factory A", 3),
            Factory::new(2, "Delta Works", 2).with_type(FactoryType::External),
        ];
        RosterStore::from_seed(students, factories).unwrap()
    }

    #[test]
    fn test_choice_treats_all_as_wildcard() {
        assert_eq!(choice("All"), None);
        assert_eq!(choice("  "), None);
        assert_eq!(choice("all"), None);
        assert_eq!(choice(" Science "), Some("Science".to_string()));
    }

    #[test]
    fn test_filter_excludes_assigned_students() {
        let store = store();
        let engine = FilterEngine::new();
        let criteria = FilterCriteria::all().department("Engineering");

        let ids = engine.filtered_student_ids(&store, &criteria);
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_name_search_is_case_insensitive_substring() {
        let store = store();
        let engine = FilterEngine::new();
        let criteria = FilterCriteria::all().search("AHMED");

        let ids = engine.filtered_student_ids(&store, &criteria);
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_factory_filter_by_type_and_name() {
        let store = store();
        let engine = FilterEngine::new();

        let criteria = FilterCriteria::all()
            .factory_type_choice("External")
            .unwrap();
        let names: Vec<_> = engine
            .filter_factories(&store, &criteria)
            .iter()
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(names, vec!["Delta Works"]);

        let criteria = FilterCriteria::all().factory_search("factory");
        assert_eq!(engine.filter_factories(&store, &criteria).len(), 1);

        assert!(FilterCriteria::all().factory_type_choice("Orbital").is_err());
    }

    #[test]
    fn test_roster_view_searches_factory_name_and_sorts() {
        let store = store();
        let engine = FilterEngine::new();

        let query = RosterQuery {
            search: "factory a".to_string(),
            ..Default::default()
        };
        let rows = engine.roster_view(&store, &query);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 3);

        let query = RosterQuery {
            sort: SortOrder::Name,
            ..Default::default()
        };
        let names: Vec<_> = engine
            .roster_view(&store, &query)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ahmed Mohamed", "Omar Ali", "Sara Ahmed"]);
    }

    #[test]
    fn test_roster_page_clamps_page_number() {
        let store = store();
        let engine = FilterEngine::new();
        let query = RosterQuery::default();

        let page = engine.roster_page(&store, &query, 2, 2).unwrap();
        assert_eq!(page.total_rows, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.rows.iter().map(|s| s.id).collect::<Vec<_>>(), vec![3]);

        let page = engine.roster_page(&store, &query, 9, 2).unwrap();
        assert_eq!(page.page, 2);
        let page = engine.roster_page(&store, &query, 0, 2).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.rows.len(), 2);

        assert!(engine.roster_page(&store, &query, 1, 0).is_err());
    }
}
