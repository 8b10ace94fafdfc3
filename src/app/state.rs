// ==========================================
// 学生实习分配系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享 API 实例
// 并发: 每个操作在同一次加锁内执行完毕,
//       保证转移的"先释放后加入"不被其它操作打断
// ==========================================

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::api::{ApiError, ApiResult, AuthGate, DistributionApi};
use crate::config::DistributionConfig;
use crate::importer::{JsonRosterSource, RosterSource, SeedRosterSource};

/// 应用状态
///
/// 可在多个线程之间克隆共享
#[derive(Clone)]
pub struct AppState {
    api: Arc<Mutex<DistributionApi>>,
}

impl AppState {
    /// 包装已创建的 API
    pub fn new(api: DistributionApi) -> Self {
        Self {
            api: Arc::new(Mutex::new(api)),
        }
    }

    /// 按配置装载名册并创建应用状态
    ///
    /// # 说明
    /// 配置了 seed_path 时从 JSON 文件装载,否则使用内置种子
    pub fn from_config(config: DistributionConfig, auth: Arc<dyn AuthGate>) -> ApiResult<Self> {
        let source: Box<dyn RosterSource> = match &config.seed_path {
            Some(path) => Box::new(JsonRosterSource::new(path)),
            None => Box::new(SeedRosterSource),
        };
        info!(source = %source.describe(), "初始化AppState");

        let api = DistributionApi::from_source(source.as_ref(), config, auth)?;
        Ok(Self::new(api))
    }

    /// 在同一次加锁内执行一个操作
    pub fn with_api<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&mut DistributionApi) -> ApiResult<T>,
    {
        let mut api = self
            .api
            .lock()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))?;
        op(&mut api)
    }
}
