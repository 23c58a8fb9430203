use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::infrastructure::store::ResourceKind;

/// 默认远程存储 API 地址
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// 服务配置结构
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 远程记录存储配置
    pub store: StoreConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

/// 远程记录存储配置
///
/// 访问密钥和存储标识缺一不可；表名可按资源覆盖。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// API 根地址
    pub api_url: String,
    /// 访问密钥
    pub api_key: Option<String>,
    /// 存储标识
    pub base_id: Option<String>,
    /// 商品表名覆盖
    pub products_table: Option<String>,
    /// 订单表名覆盖
    pub orders_table: Option<String>,
    /// 远程调用超时时间（秒）
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            base_id: None,
            products_table: None,
            orders_table: None,
            timeout_seconds: 10,
        }
    }
}

impl ServerConfig {
    /// 监听地址，形如 `0.0.0.0:3000`
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl StoreConfig {
    /// 访问密钥与存储标识是否齐全
    pub fn has_credentials(&self) -> bool {
        present(&self.api_key).is_some() && present(&self.base_id).is_some()
    }

    /// 指定资源的表名覆盖
    pub fn table_override(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Products => present(&self.products_table),
            ResourceKind::Orders => present(&self.orders_table),
        }
    }

    /// 实际使用的表名，未覆盖时取默认值
    pub fn table_name(&self, kind: ResourceKind) -> &str {
        self.table_override(kind)
            .unwrap_or_else(|| kind.default_table_name())
    }

    /// 降级开关：凭据和表名覆盖都存在时才访问远程存储
    pub fn is_configured(&self, kind: ResourceKind) -> bool {
        self.has_credentials() && self.table_override(kind).is_some()
    }
}

/// 空字符串视为未配置
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// 用环境变量覆盖配置项
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// 按给定的查找函数覆盖配置项，空值忽略
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("AIRTABLE_API_KEY") {
            self.store.api_key = Some(key);
        }
        if let Some(base_id) = get("AIRTABLE_BASE_ID") {
            self.store.base_id = Some(base_id);
        }
        if let Some(table) = get("AIRTABLE_PRODUCTS_TABLE") {
            self.store.products_table = Some(table);
        }
        if let Some(table) = get("AIRTABLE_ORDERS_TABLE") {
            self.store.orders_table = Some(table);
        }
        if let Some(url) = get("AIRTABLE_API_URL") {
            self.store.api_url = url;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation(format!("无效的端口: {}", port)))?;
        }

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证HTTP配置
        if self.server.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.server.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.server.timeout_seconds == 0 {
            return Err(ConfigError::Validation("请求超时时间必须大于0".to_string()));
        }

        // 验证存储配置
        if self.store.api_url.is_empty() {
            return Err(ConfigError::Validation("存储 API 地址不能为空".to_string()));
        }
        if self.store.timeout_seconds == 0 {
            return Err(ConfigError::Validation("存储调用超时时间必须大于0".to_string()));
        }

        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 从文件或默认值加载配置，再叠加环境变量
///
/// 返回配置及其来源文件（使用默认配置时为 `None`）。
pub fn load_config() -> Result<(Config, Option<PathBuf>), ConfigError> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(path) = std::env::var("MARKETPLACE_CONFIG") {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("config.toml"));
    candidates.push(PathBuf::from("./config/config.toml"));

    let source = candidates.into_iter().find(|path| path.exists());
    let mut config = match &source {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    config.apply_env()?;
    config.validate()?;

    Ok((config, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.store.api_url, DEFAULT_API_URL);
        assert!(!config.store.has_credentials());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_full_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[server]\nport = 8080\n\n[logging]\nlevel = \"debug\"\n\n\
             [store]\napi_key = \"keyTest\"\nbase_id = \"appMarket\"\n\
             orders_table = \"Customer Orders\"\n",
        )
        .unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert!(loaded.validate().is_ok());
        assert_eq!(loaded.server.port, 8080);
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.store.base_id.as_deref(), Some("appMarket"));
        assert!(loaded.store.is_configured(ResourceKind::Orders));
        assert!(!loaded.store.is_configured(ResourceKind::Products));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let result = Config::load_from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[server]\nport = 8088\n").unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.server.port, 8088);
        assert_eq!(loaded.server.bind_address, "0.0.0.0");
        assert_eq!(loaded.store.timeout_seconds, 10);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup(&[
                ("AIRTABLE_API_KEY", "key123"),
                ("AIRTABLE_BASE_ID", "app456"),
                ("AIRTABLE_PRODUCTS_TABLE", ""),
                ("AIRTABLE_ORDERS_TABLE", "Customer Orders"),
                ("PORT", "4000"),
            ]))
            .unwrap();

        assert_eq!(config.store.api_key.as_deref(), Some("key123"));
        assert_eq!(config.store.products_table, None);
        assert_eq!(config.server.port, 4000);

        let mut config = Config::default();
        assert!(config.apply_overrides(lookup(&[("PORT", "abc")])).is_err());
    }

    #[test]
    fn test_configured_requires_table_override() {
        let mut store = StoreConfig::default();
        store.api_key = Some("key".to_string());
        store.base_id = Some("app".to_string());
        store.orders_table = Some("Orders".to_string());

        assert!(store.has_credentials());
        assert!(store.is_configured(ResourceKind::Orders));
        assert!(!store.is_configured(ResourceKind::Products));
        assert_eq!(store.table_name(ResourceKind::Products), "Products");

        store.api_key = Some("  ".to_string());
        assert!(!store.has_credentials());
        assert!(!store.is_configured(ResourceKind::Orders));
    }
}
