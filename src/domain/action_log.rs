// ==========================================
// 学生实习分配系统 - 操作日志领域模型
// ==========================================
// 红线: 所有成功的名册写入必须记录
// 用途: 审计追踪
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::domain::types::ActionType;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,          // 日志ID (uuid v4)
    pub action_type: ActionType,    // 操作类型
    pub action_ts: DateTime<Utc>,   // 操作时间
    pub actor: String,              // 操作人
    pub detail: String,             // 可读描述
    pub payload_json: Option<JsonValue>, // 操作参数
}

impl ActionLog {
    pub fn new(action_type: ActionType, actor: &str, detail: impl Into<String>) -> Self {
        Self {
            action_id: Uuid::new_v4().to_string(),
            action_type,
            action_ts: Utc::now(),
            actor: actor.to_string(),
            detail: detail.into(),
            payload_json: None,
        }
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }
}
