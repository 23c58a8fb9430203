//! 订单业务服务

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use super::model::{Order, OrderInput, OrderPatch};
use crate::app::{fixtures, mapper};
use crate::core::error::CoreError;
use crate::core::fallback::FallbackPolicy;
use crate::infrastructure::store::{RecordStore, ResourceKind, StoreError};

#[derive(Clone)]
pub struct OrderService {
    policy: FallbackPolicy,
}

fn not_found() -> CoreError {
    CoreError::NotFound("Order not found".to_string())
}

impl OrderService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            policy: FallbackPolicy::new(store, ResourceKind::Orders),
        }
    }

    pub async fn list_orders(&self) -> Vec<Order> {
        self.policy
            .run(
                "获取订单列表",
                |table| async move {
                    let records = table.list_all().await?;
                    info!("成功从记录存储获取 {} 个订单", records.len());
                    Ok::<_, StoreError>(records.into_iter().map(mapper::to_order).collect())
                },
                || fixtures::mock_orders().to_vec(),
            )
            .await
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, CoreError> {
        let key = id.to_string();
        self.policy
            .run(
                "获取订单",
                move |table| async move {
                    let record = table.find(&key).await?;
                    Ok::<_, StoreError>(Ok(mapper::to_order(record)))
                },
                || fixtures::find_order(id).cloned().ok_or_else(not_found),
            )
            .await
    }

    /// 下单；`created_at` 在这里生成，之后不再修改
    pub async fn create_order(&self, input: OrderInput) -> Order {
        let created_at = Utc::now().to_rfc3339();
        let fields = mapper::from_order_input(&input, &created_at);
        debug!("订单数据: {:?}", fields);

        self.policy
            .run(
                "创建订单",
                |table| async move {
                    let record = table.create(fields).await?;
                    info!("订单创建成功: {}", record.id);
                    Ok::<_, StoreError>(mapper::to_order(record))
                },
                || Order::from_input(fixtures::synthetic_id("order"), &input, created_at.as_str()),
            )
            .await
    }

    /// 部分更新订单，通常用于修改状态
    pub async fn update_order(&self, id: &str, patch: OrderPatch) -> Result<Order, CoreError> {
        let key = id.to_string();
        let fields = mapper::from_order_patch(&patch);
        self.policy
            .run(
                "更新订单",
                move |table| async move {
                    let record = table.update(&key, fields).await?;
                    info!("订单更新成功: {}", record.id);
                    Ok::<_, StoreError>(Ok(mapper::to_order(record)))
                },
                || {
                    fixtures::find_order(id)
                        .map(|existing| existing.clone().patched(&patch))
                        .ok_or_else(not_found)
                },
            )
            .await
    }
}
