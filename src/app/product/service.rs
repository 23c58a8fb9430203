//! 商品业务服务

use std::sync::Arc;
use tracing::info;

use super::model::{Product, ProductInput};
use crate::app::{fixtures, mapper};
use crate::core::error::CoreError;
use crate::core::fallback::FallbackPolicy;
use crate::infrastructure::store::{RecordStore, ResourceKind, StoreError};

#[derive(Clone)]
pub struct ProductService {
    policy: FallbackPolicy,
}

fn not_found() -> CoreError {
    CoreError::NotFound("Product not found".to_string())
}

impl ProductService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            policy: FallbackPolicy::new(store, ResourceKind::Products),
        }
    }

    pub async fn list_products(&self) -> Vec<Product> {
        self.policy
            .run(
                "获取商品列表",
                |table| async move {
                    let records = table.list_all().await?;
                    info!("成功从记录存储获取 {} 个商品", records.len());
                    Ok::<_, StoreError>(records.into_iter().map(mapper::to_product).collect())
                },
                || fixtures::mock_products().to_vec(),
            )
            .await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, CoreError> {
        let key = id.to_string();
        self.policy
            .run(
                "获取商品",
                move |table| async move {
                    let record = table.find(&key).await?;
                    Ok::<_, StoreError>(Ok(mapper::to_product(record)))
                },
                || fixtures::find_product(id).cloned().ok_or_else(not_found),
            )
            .await
    }

    /// 创建商品；降级时返回合成的商品，不会持久化
    pub async fn create_product(&self, input: ProductInput) -> Product {
        let fields = mapper::from_product_input(&input);
        self.policy
            .run(
                "创建商品",
                |table| async move {
                    let record = table.create(fields).await?;
                    info!("商品创建成功: {}", record.id);
                    Ok::<_, StoreError>(mapper::to_product(record))
                },
                || Product::from_input(fixtures::synthetic_id("prod"), &input),
            )
            .await
    }

    /// 整体更新商品的可变字段
    pub async fn update_product(&self, id: &str, input: ProductInput) -> Product {
        let key = id.to_string();
        let fields = mapper::from_product_input(&input);
        self.policy
            .run(
                "更新商品",
                move |table| async move {
                    let record = table.update(&key, fields).await?;
                    info!("商品更新成功: {}", record.id);
                    Ok::<_, StoreError>(mapper::to_product(record))
                },
                || match fixtures::find_product(id) {
                    Some(existing) => existing.clone().merged(&input),
                    None => Product::from_input(id, &input),
                },
            )
            .await
    }

    /// 删除商品，结果总是视为成功
    pub async fn delete_product(&self, id: &str) {
        let key = id.to_string();
        self.policy
            .run(
                "删除商品",
                move |table| async move {
                    table.destroy(&key).await?;
                    info!("商品删除成功: {}", key);
                    Ok::<_, StoreError>(())
                },
                || (),
            )
            .await
    }
}
