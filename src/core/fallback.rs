//! 降级策略
//!
//! 先尝试远程记录存储，配置缺失或调用失败时改用模拟数据，
//! 保证调用方总能拿到结构完整的结果。

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, warn};

use crate::infrastructure::store::{RecordStore, ResourceKind, StoreError, TableHandle};

/// 执行主操作，失败时记录日志并返回降级结果
pub async fn with_fallback<T, E, Fut, F>(action: &str, primary: Fut, fallback: F) -> T
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    F: FnOnce() -> T,
{
    match primary.await {
        Ok(value) => value,
        Err(e) => {
            error!("{}失败: {}", action, e);
            warn!("{}回退到模拟数据", action);
            fallback()
        }
    }
}

/// 面向单一资源的降级策略，附带配置检查
#[derive(Clone)]
pub struct FallbackPolicy {
    store: Arc<dyn RecordStore>,
    kind: ResourceKind,
}

impl FallbackPolicy {
    pub fn new(store: Arc<dyn RecordStore>, kind: ResourceKind) -> Self {
        Self { store, kind }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_configured(self.kind)
    }

    /// 配置齐全时在打开的表上执行 `primary`，否则直接走 `fallback`
    pub async fn run<T, P, Fut, F>(&self, action: &str, primary: P, fallback: F) -> T
    where
        P: FnOnce(Arc<dyn TableHandle>) -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
        F: FnOnce() -> T,
    {
        if !self.is_configured() {
            warn!("记录存储未配置 ({})，{}使用模拟数据", self.kind, action);
            return fallback();
        }

        let attempt = async {
            let table = self.store.open_table(self.kind)?;
            primary(table).await
        };

        with_fallback(action, attempt, fallback).await
    }
}
