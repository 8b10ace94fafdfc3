// ==========================================
// 学生实习分配系统 - 身份验证门控
// ==========================================
// 职责: 每个 API 操作执行前检查登录状态
// 说明: 登录流程本身由宿主负责,此处只读取结果
// ==========================================

use std::sync::atomic::{AtomicBool, Ordering};

/// 身份验证门控
pub trait AuthGate: Send + Sync {
    /// 当前会话是否已登录
    fn is_authenticated(&self) -> bool;
}

/// 固定状态的门控 (可在运行期切换)
#[derive(Debug, Default)]
pub struct StaticAuth {
    authenticated: AtomicBool,
}

impl StaticAuth {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated: AtomicBool::new(authenticated),
        }
    }

    /// 已登录
    pub fn signed_in() -> Self {
        Self::new(true)
    }

    /// 未登录
    pub fn signed_out() -> Self {
        Self::new(false)
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }
}

impl AuthGate for StaticAuth {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}
