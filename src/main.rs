// ==========================================
// 学生实习分配系统 - 命令行入口
// ==========================================
// 用法: student-distribution [export <path>]
// 流程: 初始化日志 → 加载配置 → 装载名册 → 输出统计 → (可选) 导出
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use student_distribution::api::StaticAuth;
use student_distribution::app::AppState;
use student_distribution::config::ConfigManager;
use student_distribution::engine::RosterQuery;
use student_distribution::logging;

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", student_distribution::APP_NAME);
    tracing::info!("系统版本: {}", student_distribution::VERSION);
    tracing::info!("==================================================");

    let export_path = parse_args(std::env::args().skip(1).collect())?;

    // 加载配置
    let manager = ConfigManager::load(None).context("配置加载失败")?;
    match manager.source() {
        Some(path) => tracing::info!("使用配置文件: {}", path.display()),
        None => tracing::info!("使用默认配置"),
    }

    // 命令行会话视为已登录
    let state = AppState::from_config(manager.into_config(), Arc::new(StaticAuth::signed_in()))
        .context("名册装载失败")?;

    let stats = state
        .with_api(|api| api.statistics())
        .context("统计计算失败")?;
    tracing::info!(
        total = stats.total_students,
        assigned = stats.assigned_students,
        unassigned = stats.unassigned_students,
        "名册概况"
    );
    for factory in &stats.factories {
        tracing::info!(
            factory = %factory.name,
            capacity = factory.capacity,
            assigned = factory.assigned,
            available = factory.available,
            "工厂名额"
        );
    }

    if let Some(path) = export_path {
        let rows = state
            .with_api(|api| api.export_roster_to(&path, &RosterQuery::default()))
            .with_context(|| format!("导出失败: {}", path.display()))?;
        tracing::info!("已导出 {} 行到 {}", rows, path.display());
    }

    Ok(())
}

fn parse_args(args: Vec<String>) -> anyhow::Result<Option<PathBuf>> {
    match args.as_slice() {
        [] => Ok(None),
        [command, path] if command == "export" => Ok(Some(PathBuf::from(path))),
        _ => bail!("用法: student-distribution [export <path>]"),
    }
}
