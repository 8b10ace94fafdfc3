// ==========================================
// 学生实习分配系统 - 配置管理器
// ==========================================
// 职责: 配置加载、默认值、校验
// 存储: JSON 文件 (不存在时使用默认值)
// 查找顺序: 显式路径 > 环境变量 > 系统配置目录
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 配置文件路径环境变量
pub const CONFIG_ENV_VAR: &str = "STUDENT_DISTRIBUTION_CONFIG";

/// 系统配置目录下的子目录
pub const CONFIG_DIR_NAME: &str = "student-distribution";

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// ValidationRules - 登记表单校验阈值
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    pub factory_name_min_chars: usize,    // 工厂名最少字符数 (去首尾空白)
    pub factory_address_min_chars: usize, // 地址最少字符数 (去首尾空白)
    pub phone_min_digits: usize,          // 电话最少位数
    pub phone_max_digits: usize,          // 电话最多位数
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            factory_name_min_chars: 3,
            factory_address_min_chars: 5,
            phone_min_digits: 10,
            phone_max_digits: 15,
        }
    }
}

impl ValidationRules {
    /// 电话号码正则 (纯数字, 位数区间)
    pub fn phone_pattern(&self) -> String {
        format!(
            "^[0-9]{{{},{}}}$",
            self.phone_min_digits, self.phone_max_digits
        )
    }
}

// ==========================================
// DistributionConfig - 系统配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    /// 新建工厂的默认容量
    pub default_factory_capacity: u32,

    /// 登记表单校验阈值
    pub validation: ValidationRules,

    /// 导出日期格式 (chrono 格式串)
    pub export_date_format: String,

    /// 种子名册文件 (JSON); 为空时使用内置种子数据
    pub seed_path: Option<PathBuf>,

    /// 操作日志中的操作人
    pub actor: String,

    /// 名册列表每页行数
    pub roster_page_size: usize,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            default_factory_capacity: 10,
            validation: ValidationRules::default(),
            export_date_format: "%Y-%m-%d".to_string(),
            seed_path: None,
            actor: "admin".to_string(),
            roster_page_size: 5,
        }
    }
}

impl DistributionConfig {
    /// 校验配置取值
    pub fn validate(&self) -> anyhow::Result<()> {
        let rules = &self.validation;
        if rules.phone_min_digits == 0 || rules.phone_min_digits > rules.phone_max_digits {
            bail!(
                "电话位数区间非法: [{}, {}]",
                rules.phone_min_digits,
                rules.phone_max_digits
            );
        }
        if self.export_date_format.trim().is_empty() {
            bail!("导出日期格式不能为空");
        }
        if self.actor.trim().is_empty() {
            bail!("操作人不能为空");
        }
        if self.roster_page_size == 0 {
            bail!("名册每页行数必须大于 0");
        }
        Ok(())
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: DistributionConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 使用默认配置
    pub fn with_defaults() -> Self {
        Self {
            config: DistributionConfig::default(),
            source: None,
        }
    }

    /// 按查找顺序加载配置
    ///
    /// # 参数
    /// - explicit_path: 显式指定的配置文件 (必须存在)
    ///
    /// # 返回
    /// - 找到配置文件: 文件内容 (缺省字段取默认值)
    /// - 未找到: 默认配置
    pub fn load(explicit_path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            if !env_path.trim().is_empty() {
                return Self::from_file(Path::new(env_path.trim()));
            }
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("未找到配置文件,使用默认配置");
                Ok(Self::with_defaults())
            }
        }
    }

    /// 从指定 JSON 文件加载
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config: DistributionConfig = serde_json::from_str(&raw)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        config.validate()?;

        info!(path = %path.display(), "配置加载完成");
        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    /// 系统配置目录下的默认路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// 将当前配置写入 JSON 文件
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("创建配置目录失败: {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(&self.config)?;
        fs::write(path, raw).with_context(|| format!("写入配置文件失败: {}", path.display()))?;
        Ok(())
    }

    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    pub fn into_config(self) -> DistributionConfig {
        self.config
    }

    /// 配置来源文件 (默认配置时为 None)
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_phone_pattern() {
        let rules = ValidationRules::default();
        assert_eq!(rules.phone_pattern(), "^[0-9]{10,15}$");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "default_factory_capacity": 4 }"#).unwrap();

        let manager = ConfigManager::from_file(&path).unwrap();
        assert_eq!(manager.config().default_factory_capacity, 4);
        assert_eq!(manager.config().validation, ValidationRules::default());
        assert_eq!(manager.source(), Some(path.as_path()));
    }

    #[test]
    fn test_invalid_phone_range_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "validation": { "phone_min_digits": 12, "phone_max_digits": 8 } }"#,
        )
        .unwrap();

        assert!(ConfigManager::from_file(&path).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut manager = ConfigManager::with_defaults();
        manager.config.actor = "registrar".to_string();
        manager.save_to(&path).unwrap();

        let reloaded = ConfigManager::from_file(&path).unwrap();
        assert_eq!(reloaded.config().actor, "registrar");
    }
}
