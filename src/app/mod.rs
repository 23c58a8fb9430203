//! 应用层

pub mod fixtures;
pub mod mapper;
pub mod order;
pub mod product;

use axum::{extract::State, middleware, response::Json, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::store::{RecordStore, ResourceKind};
use order::{handler as order_handler, service::OrderService};
use product::{handler as product_handler, service::ProductService};

/// 组装全部路由与中间件
pub fn router(store: Arc<dyn RecordStore>, server: &ServerConfig) -> Router {
    Router::new()
        .merge(product_handler::routes(ProductService::new(store.clone())))
        .merge(order_handler::routes(OrderService::new(store.clone())))
        .route("/health", get(health_check).with_state(store))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(TimeoutLayer::new(Duration::from_secs(server.timeout_seconds))),
        )
}

/// 健康检查
async fn health_check(State(store): State<Arc<dyn RecordStore>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "store": {
            "products": store.is_configured(ResourceKind::Products),
            "orders": store.is_configured(ResourceKind::Orders),
        }
    }))
}
