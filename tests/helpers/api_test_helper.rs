// ==========================================
// API 测试辅助
// ==========================================
// 职责: 构建带门控的 DistributionApi 测试环境
// ==========================================

#![allow(dead_code)]

use std::sync::Arc;

use student_distribution::api::StaticAuth;
use student_distribution::config::DistributionConfig;
use student_distribution::importer::SeedRosterSource;
use student_distribution::{DistributionApi, RosterStore};

/// API 测试环境
pub struct ApiTestEnv {
    pub api: DistributionApi,
    pub auth: Arc<StaticAuth>,
}

impl ApiTestEnv {
    /// 内置种子名册, 已登录
    pub fn new() -> Self {
        let auth = Arc::new(StaticAuth::signed_in());
        let api = DistributionApi::from_source(
            &SeedRosterSource,
            DistributionConfig::default(),
            auth.clone(),
        )
        .expect("无法创建测试环境");
        Self { api, auth }
    }

    /// 指定名册, 已登录
    pub fn with_store(store: RosterStore) -> Self {
        Self::with_store_and_config(store, DistributionConfig::default())
    }

    pub fn with_store_and_config(store: RosterStore, config: DistributionConfig) -> Self {
        let auth = Arc::new(StaticAuth::signed_in());
        let api =
            DistributionApi::new(store, config, auth.clone()).expect("无法创建测试环境");
        Self { api, auth }
    }

    pub fn sign_out(&self) {
        self.auth.set_authenticated(false);
    }
}
