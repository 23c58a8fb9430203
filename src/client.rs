//! 客户端数据访问封装
//!
//! 通过 HTTP 调用服务端接口；网络失败或返回非成功状态时改用本地模拟数据，
//! 调用方只会在按 ID 查询不到时收到 `ClientError::NotFound`。

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::app::fixtures;
use crate::app::order::model::{Order, OrderInput, OrderPatch};
use crate::app::product::model::{Product, ProductInput};
use crate::core::error::ErrorResponse;
use crate::core::fallback::with_fallback;
use crate::core::response::SuccessResponse;

/// 客户端错误类型
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    NotFound(String),
    #[error("请求失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("服务端返回 {status}: {message}")]
    Status { status: u16, message: String },
    #[error("无效的服务地址: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http: Client,
    base_url: String,
}

impl MarketplaceClient {
    /// `base_url` 需包含 `/api` 前缀，例如 `http://127.0.0.1:3000/api`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 在 `base_url` 后追加路径段，ID 中的 `/`、`?` 等字符会被转义
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        Ok(self.http.request(method, self.endpoint(segments)?))
    }

    async fn send<T: DeserializeOwned>(
        request: Result<RequestBuilder, ClientError>,
    ) -> Result<T, ClientError> {
        let response = request?.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn get_products(&self) -> Vec<Product> {
        info!("请求商品列表...");
        let request = self.request(Method::GET, &["products"]);
        with_fallback(
            "获取商品列表",
            Self::send::<Vec<Product>>(request),
            || fixtures::mock_products().to_vec(),
        )
        .await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, ClientError> {
        info!("请求商品 {}...", id);
        let request = self.request(Method::GET, &["products", id]);
        with_fallback(
            "获取商品",
            async { Self::send::<Product>(request).await.map(Ok) },
            || {
                fixtures::find_product(id)
                    .cloned()
                    .ok_or_else(|| ClientError::NotFound("Product not found".to_string()))
            },
        )
        .await
    }

    /// 创建商品；失败时返回本地合成的商品
    pub async fn create_product(&self, input: &ProductInput) -> Product {
        info!("请求创建商品...");
        let request = self
            .request(Method::POST, &["products"])
            .map(|r| r.json(input));
        with_fallback("创建商品", Self::send::<Product>(request), || {
            Product::from_input(fixtures::synthetic_id("prod"), input)
        })
        .await
    }

    pub async fn update_product(&self, id: &str, input: &ProductInput) -> Product {
        info!("请求更新商品 {}...", id);
        let request = self
            .request(Method::PUT, &["products", id])
            .map(|r| r.json(input));
        with_fallback("更新商品", Self::send::<Product>(request), || {
            Product::from_input(id, input)
        })
        .await
    }

    /// 删除商品，失败也视为成功
    pub async fn delete_product(&self, id: &str) {
        info!("请求删除商品 {}...", id);
        let request = self.request(Method::DELETE, &["products", id]);
        with_fallback(
            "删除商品",
            async { Self::send::<SuccessResponse>(request).await.map(|_| ()) },
            || (),
        )
        .await
    }

    pub async fn get_orders(&self) -> Vec<Order> {
        info!("请求订单列表...");
        let request = self.request(Method::GET, &["orders"]);
        with_fallback(
            "获取订单列表",
            Self::send::<Vec<Order>>(request),
            || fixtures::mock_orders().to_vec(),
        )
        .await
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, ClientError> {
        info!("请求订单 {}...", id);
        let request = self.request(Method::GET, &["orders", id]);
        with_fallback(
            "获取订单",
            async { Self::send::<Order>(request).await.map(Ok) },
            || {
                fixtures::find_order(id)
                    .cloned()
                    .ok_or_else(|| ClientError::NotFound("Order not found".to_string()))
            },
        )
        .await
    }

    /// 下单；失败时返回本地合成的订单
    pub async fn create_order(&self, input: &OrderInput) -> Order {
        info!("请求创建订单...");
        let request = self
            .request(Method::POST, &["orders"])
            .map(|r| r.json(input));
        with_fallback("创建订单", Self::send::<Order>(request), || {
            Order::from_input(
                fixtures::synthetic_id("order"),
                input,
                chrono::Utc::now().to_rfc3339(),
            )
        })
        .await
    }

    pub async fn update_order(&self, id: &str, patch: &OrderPatch) -> Result<Order, ClientError> {
        info!("请求更新订单 {}...", id);
        let request = self
            .request(Method::PUT, &["orders", id])
            .map(|r| r.json(patch));
        with_fallback(
            "更新订单",
            async { Self::send::<Order>(request).await.map(Ok) },
            || {
                fixtures::find_order(id)
                    .map(|existing| existing.clone().patched(patch))
                    .ok_or_else(|| ClientError::NotFound("Order not found".to_string()))
            },
        )
        .await
    }
}
