// ==========================================
// 学生实习分配系统 - 名册统计
// ==========================================
// 职责: 按院系 / 工厂 / 班组 / 阶段统计人数与占比, 工厂利用率
// 红线: 纯函数; 空名册占比为 0 (不产生 NaN)
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::factory::{CapacityConstraint, FactoryId};
use crate::domain::student::Student;
use crate::repository::roster_repo::RosterStore;

/// 未分配学生在工厂统计中的标签
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// 单个分组统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBucket {
    pub name: String,
    pub count: usize,
    pub percentage: f64, // 0.0 - 100.0
}

/// 工厂利用率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryUtilization {
    pub factory_id: FactoryId,
    pub name: String,
    pub capacity: u32,
    pub assigned: u32,
    pub available: u32,
    pub utilization: f64, // 0.0 - 1.0
}

/// 名册统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterStatistics {
    pub total_students: usize,
    pub assigned_students: usize,
    pub unassigned_students: usize,
    pub by_department: Vec<StatBucket>,
    pub by_factory: Vec<StatBucket>,
    pub by_group: Vec<StatBucket>,
    pub by_stage: Vec<StatBucket>,
    pub factories: Vec<FactoryUtilization>,
}

// ==========================================
// StatisticsEngine - 统计引擎
// ==========================================
#[derive(Debug, Default)]
pub struct StatisticsEngine {}

impl StatisticsEngine {
    pub fn new() -> Self {
        Self {}
    }

    pub fn compute(&self, store: &RosterStore) -> RosterStatistics {
        let students = store.students();
        let total = students.len();
        let assigned = students.iter().filter(|s| s.is_assigned()).count();

        // 工厂统计: 每个登记工厂一行 (含 0 人), 最后追加未分配
        let mut by_factory: Vec<StatBucket> = store
            .factories()
            .iter()
            .map(|f| bucket(&f.name, f.assigned_count() as usize, total))
            .collect();
        by_factory.push(bucket(UNASSIGNED_LABEL, total - assigned, total));

        let factories = store
            .factories()
            .iter()
            .map(|f| FactoryUtilization {
                factory_id: f.id,
                name: f.name.clone(),
                capacity: f.capacity,
                assigned: f.assigned_count(),
                available: f.available_capacity(),
                utilization: f.utilization(),
            })
            .collect();

        RosterStatistics {
            total_students: total,
            assigned_students: assigned,
            unassigned_students: total - assigned,
            by_department: group_by(students, |s| &s.department),
            by_factory,
            by_group: group_by(students, |s| &s.group),
            by_stage: group_by(students, |s| &s.stage),
            factories,
        }
    }
}

fn bucket(name: &str, count: usize, total: usize) -> StatBucket {
    let percentage = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    };
    StatBucket {
        name: name.to_string(),
        count,
        percentage,
    }
}

/// 按字段分组计数 (首次出现顺序)
fn group_by<F>(students: &[Student], key: F) -> Vec<StatBucket>
where
    F: Fn(&Student) -> &String,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for student in students {
        let value = key(student);
        match counts.iter_mut().find(|(name, _)| name == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value.clone(), 1)),
        }
    }
    counts
        .into_iter()
        .map(|(name, count)| bucket(&name, count, students.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::Factory;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_roster_has_zero_percentages() {
        let store = RosterStore::from_seed(vec![], vec![Factory::new(1, "Factory A", 3)]).unwrap();
        let stats = StatisticsEngine::new().compute(&store);
        assert_eq!(stats.total_students, 0);
        assert!(stats.by_factory.iter().all(|b| b.percentage == 0.0));
        assert_eq!(stats.factories[0].available, 3);
    }

    #[test]
    fn test_counts_and_percentages() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let students = vec![
            Student::new(1, "A", "Engineering", "Group A", "Stage 1", date).with_assignment(1),
            Student::new(2, "B", "Science", "Group A", "Stage 1", date),
            Student::new(3, "C", "Engineering", "Group B", "Stage 2", date),
            Student::new(4, "D", "Engineering", "Group B", "Stage 2", date).with_assignment(1),
        ];
        let store = RosterStore::from_seed(students, vec![Factory::new(1, "Factory A", 4)]).unwrap();
        let stats = StatisticsEngine::new().compute(&store);

        assert_eq!(stats.assigned_students, 2);
        assert_eq!(stats.by_department[0].name, "Engineering");
        assert_eq!(stats.by_department[0].count, 3);
        assert_eq!(stats.by_department[0].percentage, 75.0);
        assert_eq!(stats.by_factory[0].count, 2);
        assert_eq!(stats.by_factory[1].name, UNASSIGNED_LABEL);
        assert_eq!(stats.factories[0].utilization, 0.5);
    }
}
