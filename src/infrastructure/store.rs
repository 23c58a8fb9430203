//! 远程记录存储抽象

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// 远程存储使用的字段映射
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// 资源类型，每种资源对应一张表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Products,
    Orders,
}

impl ResourceKind {
    /// 未配置覆盖时使用的表名
    pub fn default_table_name(&self) -> &'static str {
        match self {
            ResourceKind::Products => "Products",
            ResourceKind::Orders => "Orders",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Products => write!(f, "products"),
            ResourceKind::Orders => write!(f, "orders"),
        }
    }
}

/// 远程存储返回的原始记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: FieldMap,
}

/// 存储错误类型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("存储配置不完整: {0}")]
    Config(String),
    #[error("记录不存在: {0}")]
    NotFound(String),
    #[error("远程存储调用失败: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Remote(err.to_string())
    }
}

/// 已打开的表句柄
#[async_trait]
pub trait TableHandle: Send + Sync {
    async fn find(&self, id: &str) -> Result<RawRecord, StoreError>;
    async fn list_all(&self) -> Result<Vec<RawRecord>, StoreError>;
    async fn create(&self, fields: FieldMap) -> Result<RawRecord, StoreError>;
    async fn update(&self, id: &str, fields: FieldMap) -> Result<RawRecord, StoreError>;
    async fn destroy(&self, id: &str) -> Result<(), StoreError>;
}

/// 记录存储
pub trait RecordStore: Send + Sync {
    /// 该资源是否满足访问远程存储的全部配置
    fn is_configured(&self, kind: ResourceKind) -> bool;

    /// 打开资源对应的表，凭据缺失时立即返回 `StoreError::Config`
    fn open_table(&self, kind: ResourceKind) -> Result<Arc<dyn TableHandle>, StoreError>;
}
