// ==========================================
// 学生实习分配系统 - 配置层
// ==========================================
// 职责: 系统配置管理 (默认容量、校验阈值、导出格式、种子来源)
// 存储: JSON 配置文件
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{ConfigManager, DistributionConfig, ValidationRules, CONFIG_ENV_VAR};
