//! 订单处理器

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use super::{
    model::{Order, OrderInput, OrderPatch},
    service::OrderService,
};
use crate::core::{error::CoreError, response::created};

#[derive(Clone)]
pub struct OrderState {
    pub order_service: OrderService,
}

/// 订单路由，订单不支持删除
pub fn routes(order_service: OrderService) -> Router {
    Router::new()
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/:id", get(get_order).put(update_order))
        .with_state(OrderState { order_service })
}

pub async fn list_orders(State(state): State<OrderState>) -> Json<Vec<Order>> {
    Json(state.order_service.list_orders().await)
}

/// 下单
pub async fn create_order(
    State(state): State<OrderState>,
    payload: Result<Json<OrderInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), CoreError> {
    let Json(input) = payload?;
    input.check()?;

    let order = state.order_service.create_order(input).await;
    Ok(created(order))
}

pub async fn get_order(
    State(state): State<OrderState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, CoreError> {
    let order = state.order_service.get_order(&id).await?;
    Ok(Json(order))
}

/// 更新订单（部分字段）
pub async fn update_order(
    State(state): State<OrderState>,
    Path(id): Path<String>,
    payload: Result<Json<OrderPatch>, JsonRejection>,
) -> Result<Json<Order>, CoreError> {
    let Json(patch) = payload?;

    let order = state.order_service.update_order(&id, patch).await?;
    Ok(Json(order))
}
